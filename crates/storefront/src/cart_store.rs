//! Session-persisted cart store.
//!
//! The cart lives in the session under a fixed key as a JSON array of
//! `{product, quantity}` objects. Every successful mutation re-persists the
//! full line list, so the session always reflects the last mutation.
//!
//! Unreadable persisted state (corrupt or incompatible data) is discarded
//! and replaced with an empty cart rather than failing the request; the
//! customer loses a broken cart, never their session.

use tower_sessions::Session;
use tracing::instrument;

use greenbasket_core::{Cart, Product, ProductId};

use crate::models::session_keys;

/// The single mutation surface for cart state.
///
/// Wraps the request's [`Session`]; constructed per request by handlers.
pub struct CartStore {
    session: Session,
}

impl CartStore {
    /// Create a cart store over the request's session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// Load the cart from the session.
    ///
    /// Absent or malformed state yields an empty cart. Deserialization also
    /// repairs invariant violations (duplicate lines merge, zero quantities
    /// drop) via `Cart::from_lines`.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Cart {
        match self.session.get::<Cart>(session_keys::CART).await {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(error = %err, "Discarding unreadable persisted cart");
                Cart::new()
            }
        }
    }

    /// Persist the full line list back to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn save(&self, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(session_keys::CART, cart).await
    }

    /// Add a product snapshot to the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn add_item(
        &self,
        product: Product,
        quantity: u32,
    ) -> Result<Cart, tower_sessions::session::Error> {
        let mut cart = self.load().await;
        cart.add_item(product, quantity);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Remove a line and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn remove_item(
        &self,
        product_id: &ProductId,
    ) -> Result<Cart, tower_sessions::session::Error> {
        let mut cart = self.load().await;
        cart.remove_item(product_id);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Set a line's quantity (zero removes) and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn set_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, tower_sessions::session::Error> {
        let mut cart = self.load().await;
        cart.set_quantity(product_id, quantity);
        self.save(&cart).await?;
        Ok(cart)
    }

    /// Empty the cart and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be written.
    pub async fn clear(&self) -> Result<Cart, tower_sessions::session::Error> {
        let mut cart = self.load().await;
        cart.clear();
        self.save(&cart).await?;
        Ok(cart)
    }
}
