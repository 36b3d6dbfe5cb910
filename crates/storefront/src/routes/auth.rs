//! Auth route handlers.
//!
//! The storefront never sees credentials: the browser signs in with the
//! identity provider, then posts the resulting token here. We verify it,
//! store the identity in the session, and the provider stays the source of
//! truth for accounts.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{self, Result};
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::state::AppState;

/// Sign-in request body.
#[derive(Debug, Deserialize)]
pub struct SignInForm {
    /// Session token issued by the identity provider.
    pub token: String,
}

/// Sign-in entry point.
///
/// Unauthenticated checkout and order-history requests land here.
pub async fn sign_in_entry() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "sign in required",
            "hint": "POST /auth/session with an identity-provider token",
        })),
    )
}

/// Current user, or 401 when nobody is signed in.
pub async fn show_session(OptionalAuth(user): OptionalAuth) -> Response {
    match user {
        Some(user) => Json(user).into_response(),
        None => StatusCode::UNAUTHORIZED.into_response(),
    }
}

/// Sign in: verify the provider token and store the identity in the session.
#[instrument(skip(state, session, form))]
pub async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SignInForm>,
) -> Result<Json<CurrentUser>> {
    let auth_user = state.identity().verify_token(&form.token).await?;
    let user = CurrentUser::from(auth_user);

    set_current_user(&session, &user).await?;
    error::set_sentry_user(&user.id, Some(&user.email));
    tracing::info!(user_id = %user.id, "User signed in");

    Ok(Json(user))
}

/// Sign out: drop the identity from the session.
///
/// The cart deliberately survives sign-out; it belongs to the browser
/// session, not the account.
#[instrument(skip(session))]
pub async fn delete_session(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    error::clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}
