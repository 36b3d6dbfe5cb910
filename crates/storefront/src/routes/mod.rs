//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (pings the document store)
//!
//! # Products
//! GET  /products               - Product listing (?category=, ?q=, ?featured=)
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart with derived totals
//! POST /cart/add               - Add product snapshot to cart
//! POST /cart/update            - Update quantity (<= 0 removes)
//! POST /cart/remove            - Remove line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart item count badge
//!
//! # Checkout (requires auth)
//! GET  /checkout               - Checkout state (redirects to /cart when empty)
//! POST /checkout/address       - Confirm delivery address
//! POST /checkout/place         - Place the order
//!
//! # Orders (requires auth)
//! GET  /orders                 - Order history, newest first
//!
//! # Auth
//! GET  /auth/sign-in           - Sign-in entry point
//! GET  /auth/session           - Current user
//! POST /auth/session           - Sign in with an identity-provider token
//! DELETE /auth/session         - Sign out
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/address", post(checkout::address))
        .route("/place", post(checkout::place))
}

/// Create the order-history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(orders::index))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-in", get(auth::sign_in_entry))
        .route(
            "/session",
            get(auth::show_session)
                .post(auth::create_session)
                .delete(auth::delete_session),
        )
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/orders", order_routes())
        .nest("/auth", auth_routes())
}
