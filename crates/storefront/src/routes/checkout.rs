//! Checkout route handlers.
//!
//! The checkout session lives in the browser session between requests; each
//! handler loads it, drives the state machine, and persists it back. The
//! cart is only ever cleared after the order gateway accepts the order.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::{Address, Cart, CheckoutError, CheckoutSession, CheckoutState};

use crate::cart_store::CartStore;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::session_keys;
use crate::routes::cart::CartView;
use crate::services;
use crate::state::AppState;

/// Checkout display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub state: CheckoutState,
    pub address: Option<Address>,
    /// Message from the most recent failed submission, if any.
    pub error: Option<String>,
    pub cart: CartView,
}

impl CheckoutView {
    fn new(checkout: &CheckoutSession, cart: &Cart) -> Self {
        Self {
            state: checkout.state(),
            address: checkout.address().cloned(),
            error: checkout.error().map(str::to_owned),
            cart: CartView::from_cart(cart),
        }
    }
}

/// Delivery address request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressForm {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the checkout session, discarding unreadable state.
async fn load_checkout(session: &Session) -> Option<CheckoutSession> {
    match session.get::<CheckoutSession>(session_keys::CHECKOUT).await {
        Ok(checkout) => checkout,
        Err(err) => {
            tracing::warn!(error = %err, "Discarding unreadable checkout state");
            None
        }
    }
}

/// Persist the checkout session.
async fn save_checkout(session: &Session, checkout: &CheckoutSession) -> Result<()> {
    session.insert(session_keys::CHECKOUT, checkout).await?;
    Ok(())
}

/// Drop the checkout session (after completion).
async fn clear_checkout(session: &Session) -> Result<()> {
    session
        .remove::<CheckoutSession>(session_keys::CHECKOUT)
        .await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout state.
///
/// Entry requires a non-empty cart; an empty one redirects back to the cart
/// view. On first entry the saved profile address, if any, is confirmed
/// automatically so returning customers skip the address form.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let cart = CartStore::new(session.clone()).load().await;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let mut checkout = load_checkout(&session).await.unwrap_or_default();
    if checkout.is_completed() {
        // Completed sessions are terminal; a fresh visit starts over.
        checkout = CheckoutSession::new();
    }

    if checkout.state() == CheckoutState::AwaitingAddress {
        match state.profiles().address(&user.id).await {
            Ok(Some(saved)) => {
                let _ = checkout.confirm_address(saved);
            }
            Ok(None) => {}
            Err(err) => {
                // Prefill is a convenience; the customer can still type one in.
                tracing::warn!(error = %err, "Failed to fetch profile address");
            }
        }
    }

    save_checkout(&session, &checkout).await?;
    Ok(Json(CheckoutView::new(&checkout, &cart)).into_response())
}

/// Confirm the delivery address.
///
/// Validation failures respond 422 listing every missing field; the address
/// is persisted to the profile best-effort.
#[instrument(skip(state, session, form))]
pub async fn address(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Json(form): Json<AddressForm>,
) -> Result<Json<CheckoutView>> {
    let cart = CartStore::new(session.clone()).load().await;
    if cart.is_empty() {
        return Err(AppError::Checkout(CheckoutError::EmptyCart));
    }

    let address = Address::new(
        &form.street,
        &form.city,
        &form.state,
        &form.zip_code,
        &form.country,
    )?;

    let mut checkout = load_checkout(&session).await.unwrap_or_default();
    services::checkout::confirm_address(state.profiles(), &user.id, &mut checkout, address)
        .await?;
    save_checkout(&session, &checkout).await?;

    Ok(Json(CheckoutView::new(&checkout, &cart)))
}

/// Place the order.
///
/// On success the cart is cleared, the checkout session ends, and the
/// persisted order is returned. On gateway failure the cart and address are
/// preserved and the rolled-back session is stored for retry.
#[instrument(skip(state, session))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let cart_store = CartStore::new(session.clone());
    let mut cart = cart_store.load().await;

    let Some(mut checkout) = load_checkout(&session).await else {
        return Err(AppError::BadRequest(
            "no active checkout session".to_string(),
        ));
    };

    match services::checkout::place_order(state.orders(), user.id, &mut cart, &mut checkout).await
    {
        Ok(order) => {
            cart_store.save(&cart).await?;
            clear_checkout(&session).await?;
            Ok((StatusCode::CREATED, Json(order)).into_response())
        }
        Err(err) => {
            // The cart was never touched; store the rolled-back session so
            // the customer can retry from AddressConfirmed.
            save_checkout(&session, &checkout).await?;
            Err(err.into())
        }
    }
}
