//! Cart route handlers.
//!
//! Every mutation loads the cart from the session, applies the change via
//! the core aggregate, persists the full line list, and responds with the
//! updated cart so the client never has to re-fetch. Totals come from the
//! shared pricing policy, the same one that prices the submitted order.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::{Cart, CartLine, PricingBreakdown, ProductId};

use crate::cart_store::CartStore;
use crate::error::Result;
use crate::state::AppState;

/// Cart display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub item_count: u32,
    /// Derived figures for the order summary panel.
    #[serde(flatten)]
    pub pricing: PricingBreakdown,
}

impl CartView {
    /// Build the display view for a cart.
    #[must_use]
    pub fn from_cart(cart: &Cart) -> Self {
        Self {
            items: cart.lines().to_vec(),
            item_count: cart.item_count(),
            pricing: PricingBreakdown::for_subtotal(cart.subtotal()),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCountView {
    pub count: u32,
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartForm {
    pub product_id: ProductId,
    /// Signed so clients can send zero or below to remove the line.
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartForm {
    pub product_id: ProductId,
}

/// Display the cart with derived totals.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = CartStore::new(session).load().await;
    Json(CartView::from_cart(&cart))
}

/// Add an item to the cart.
///
/// Fetches the product from the catalog and stores a snapshot, so later
/// catalog changes never reprice this line. No stock check happens here -
/// stock is advisory display data.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state.catalog().get(&form.product_id).await?;
    let quantity = form.quantity.unwrap_or(1);

    let cart = CartStore::new(session).add_item(product, quantity).await?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// Update a line's quantity. Zero or below removes the line.
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let quantity = u32::try_from(form.quantity.max(0)).unwrap_or(u32::MAX);

    let cart = CartStore::new(session)
        .set_quantity(&form.product_id, quantity)
        .await?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// Remove a line from the cart. A no-op when the id is absent.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    let cart = CartStore::new(session).remove_item(&form.product_id).await?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let cart = CartStore::new(session).clear().await?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// Get the cart item count.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCountView> {
    let cart = CartStore::new(session).load().await;
    Json(CartCountView {
        count: cart.item_count(),
    })
}
