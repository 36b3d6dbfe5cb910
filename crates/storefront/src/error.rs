//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use greenbasket_core::{AddressError, CheckoutError};

use crate::docstore::DocStoreError;
use crate::identity::IdentityError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document-store gateway call failed.
    #[error("Gateway error: {0}")]
    Gateway(#[from] DocStoreError),

    /// Identity-provider call failed.
    #[error("Identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Address validation failed.
    #[error("Validation error: {0}")]
    Validation(#[from] AddressError),

    /// Checkout transition was not allowed.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session state could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    ///
    /// Client-side errors (not-found, validation, auth) are expected traffic.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Gateway(DocStoreError::NotFound(_)) | Self::Identity(IdentityError::InvalidToken) => false,
            Self::Gateway(_) | Self::Identity(_) | Self::Session(_) | Self::Internal(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Gateway(err) => match err {
                DocStoreError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Identity(err) => match err {
                IdentityError::InvalidToken => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Empty carts, missing addresses, and out-of-order transitions
            // all mean the checkout state moved under the client.
            Self::Checkout(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let body = match &self {
            Self::Gateway(DocStoreError::NotFound(what)) => json!({
                "error": format!("Not found: {what}"),
            }),
            Self::Gateway(_) => json!({
                "error": "External service error, please retry",
            }),
            Self::Identity(IdentityError::InvalidToken) => json!({
                "error": "Invalid or expired sign-in token",
            }),
            Self::Identity(_) => json!({
                "error": "External service error, please retry",
            }),
            Self::Session(_) | Self::Internal(_) => json!({
                "error": "Internal server error",
            }),
            Self::Validation(err) => json!({
                "error": err.to_string(),
                "fields": err.fields(),
            }),
            Self::Checkout(err) => json!({
                "error": err.to_string(),
            }),
            _ => json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
