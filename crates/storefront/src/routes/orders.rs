//! Order-history route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use greenbasket_core::Order;

use crate::docstore::OrderGateway;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order-history response.
#[derive(Debug, Serialize)]
pub struct OrderListView {
    pub orders: Vec<Order>,
}

/// List the signed-in user's orders, newest first.
#[instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<OrderListView>> {
    let orders = state.orders().list_for_user(&user.id).await?;
    Ok(Json(OrderListView { orders }))
}
