//! The shopping cart aggregate.
//!
//! A [`Cart`] is an ordered list of [`CartLine`]s owned by a single browser
//! session. Two invariants hold across every mutation:
//!
//! - at most one line per distinct product id (adding an already-present
//!   product increments its quantity instead of appending a duplicate line);
//! - no line ever has a quantity of zero (reducing a quantity to zero
//!   removes the line).
//!
//! `item_count` and `subtotal` are recomputed from the line list on every
//! access, never cached, so they cannot drift from the lines.
//!
//! The serialized form is exactly the persisted wire format: a JSON array of
//! `{product, quantity}` objects. Deserialization routes through
//! [`Cart::from_lines`], which repairs state that violates the invariants
//! (duplicate ids merge, non-positive quantities drop) instead of failing.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductId};

/// A product snapshot paired with a quantity.
///
/// The product is a copy taken at add time, so catalog price changes do not
/// retroactively affect items already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price() * Decimal::from(self.quantity)
    }
}

/// An ordered collection of cart lines.
///
/// Insertion order is preserved for display stability.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Rebuild a cart from persisted lines, repairing invariant violations.
    ///
    /// Lines with a zero quantity are dropped and lines sharing a product id
    /// are merged into the first occurrence, preserving insertion order.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            cart.add_item(line.product, line.quantity);
        }
        cart
    }

    /// The current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of items: the sum of all line quantities.
    ///
    /// Recomputed on every call.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Sum of effective unit price times quantity across all lines.
    ///
    /// Recomputed on every call.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |acc, line| acc + line.line_total())
    }

    /// Add a product snapshot to the cart.
    ///
    /// If a line for the product already exists its quantity is incremented;
    /// otherwise a new line is appended. A zero quantity is a no-op, so the
    /// no-zero-quantity-lines invariant holds for every input.
    pub fn add_item(&mut self, product: Product, quantity: u32) {
        if quantity == 0 {
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine { product, quantity });
        }
    }

    /// Remove the line for a product id.
    ///
    /// A no-op (not an error) when the id is absent.
    pub fn remove_item(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product.id != product_id);
    }

    /// Set the quantity of an existing line.
    ///
    /// A quantity of zero removes the line. Absent ids are a no-op: unlike
    /// [`Cart::add_item`], this never creates a line, because quantity
    /// controls are only presented for items already in the cart.
    pub fn set_quantity(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove_item(product_id);
            return;
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| &line.product.id == product_id)
        {
            line.quantity = quantity;
        }
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let lines = Vec::<CartLine>::deserialize(deserializer)?;
        Ok(Self::from_lines(lines))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn product(id: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Product {id}"),
            description: String::new(),
            price,
            image: String::new(),
            category: Category::Pantry,
            subcategory: None,
            unit: "each".to_string(),
            stock: 10,
            discount: None,
            featured: None,
            organic: None,
        }
    }

    #[test]
    fn test_add_merges_lines_for_same_product() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::new(299, 2)), 2);
        cart.add_item(product("a", Decimal::new(299, 2)), 3);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_zero_quantity_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::ONE), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::ONE), 1);
        cart.add_item(product("b", Decimal::ONE), 1);
        cart.add_item(product("a", Decimal::ONE), 1);

        let ids: Vec<&str> = cart
            .lines()
            .iter()
            .map(|line| line.product.id.as_str())
            .collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::ONE), 1);
        cart.remove_item(&ProductId::new("missing"));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_set_quantity_zero_equals_remove() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::ONE), 3);

        let mut removed = cart.clone();
        removed.remove_item(&ProductId::new("a"));
        cart.set_quantity(&ProductId::new("a"), 0);

        assert_eq!(cart, removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_does_not_create_lines() {
        let mut cart = Cart::new();
        cart.set_quantity(&ProductId::new("a"), 4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_overwrites() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::ONE), 3);
        cart.set_quantity(&ProductId::new("a"), 7);
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_derived_values_track_mutations() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::new(299, 2)), 2);
        cart.add_item(product("b", Decimal::new(199, 2)), 1);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::new(797, 2));

        cart.set_quantity(&ProductId::new("a"), 1);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.subtotal(), Decimal::new(498, 2));

        cart.remove_item(&ProductId::new("b"));
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal(), Decimal::new(299, 2));

        cart.clear();
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn test_subtotal_uses_effective_price() {
        let mut discounted = product("a", Decimal::new(1000, 2));
        discounted.discount = Some(25);

        let mut cart = Cart::new();
        cart.add_item(discounted, 2);
        // 10.00 * 75% * 2 = 15.00
        assert_eq!(cart.subtotal(), Decimal::new(1500, 2));
    }

    #[test]
    fn test_from_lines_repairs_duplicates_and_zeroes() {
        let lines = vec![
            CartLine {
                product: product("a", Decimal::ONE),
                quantity: 2,
            },
            CartLine {
                product: product("b", Decimal::ONE),
                quantity: 0,
            },
            CartLine {
                product: product("a", Decimal::ONE),
                quantity: 1,
            },
        ];

        let cart = Cart::from_lines(lines);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product.id, ProductId::new("a"));
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_serde_round_trip_preserves_lines_and_order() {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::new(299, 2)), 2);
        cart.add_item(product("b", Decimal::new(449, 2)), 1);

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);

        // The wire format is a plain array of {product, quantity} objects.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let array = value.as_array().unwrap();
        assert_eq!(array.len(), 2);
        assert_eq!(array[0]["quantity"], 2);
        assert!(array[0]["product"].is_object());
    }
}
