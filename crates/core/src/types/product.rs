//! Catalog product types.
//!
//! A [`Product`] is immutable from the cart's perspective: the cart stores a
//! snapshot copy taken at add time, so later catalog changes never
//! retroactively reprice items already in a cart.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Document-store id.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Unit price in the store currency. Non-negative.
    pub price: Decimal,
    /// Image URL.
    pub image: String,
    /// Category tag.
    pub category: Category,
    /// Optional finer-grained category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    /// Sales unit label (e.g., "bunch", "loaf", "half gallon").
    pub unit: String,
    /// Stock on hand. Advisory only - nothing in the cart path enforces it.
    pub stock: u32,
    /// Discount percentage (0-100), applied to the unit price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u8>,
    /// Featured on the home page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    /// Certified organic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic: Option<bool>,
}

impl Product {
    /// Unit price after applying the discount percentage, if any.
    ///
    /// Discounts above 100% are clamped to free rather than negative.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discount {
            Some(percent) => {
                let percent = percent.min(100);
                self.price * Decimal::from(100 - percent) / Decimal::ONE_HUNDRED
            }
            None => self.price,
        }
    }
}

/// Grocery category tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Fruits,
    Vegetables,
    Dairy,
    Bakery,
    Meat,
    Seafood,
    Frozen,
    Pantry,
    Beverages,
    Snacks,
    Household,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Self; 11] = [
        Self::Fruits,
        Self::Vegetables,
        Self::Dairy,
        Self::Bakery,
        Self::Meat,
        Self::Seafood,
        Self::Frozen,
        Self::Pantry,
        Self::Beverages,
        Self::Snacks,
        Self::Household,
    ];

    /// The wire tag for this category (matches the serde representation).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fruits => "fruits",
            Self::Vegetables => "vegetables",
            Self::Dairy => "dairy",
            Self::Bakery => "bakery",
            Self::Meat => "meat",
            Self::Seafood => "seafood",
            Self::Frozen => "frozen",
            Self::Pantry => "pantry",
            Self::Beverages => "beverages",
            Self::Snacks => "snacks",
            Self::Household => "household",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("invalid category: {s}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn bananas() -> Product {
        Product {
            id: ProductId::new("1"),
            name: "Organic Bananas".to_string(),
            description: "Sweet and yellow organic bananas.".to_string(),
            price: Decimal::new(299, 2),
            image: "https://images.example.com/bananas.jpg".to_string(),
            category: Category::Fruits,
            subcategory: None,
            unit: "bunch".to_string(),
            stock: 50,
            discount: None,
            featured: Some(true),
            organic: Some(true),
        }
    }

    #[test]
    fn test_effective_price_without_discount() {
        assert_eq!(bananas().effective_price(), Decimal::new(299, 2));
    }

    #[test]
    fn test_effective_price_with_discount() {
        let product = Product {
            discount: Some(10),
            ..bananas()
        };
        // 2.99 * 90% = 2.691
        assert_eq!(product.effective_price(), Decimal::new(2691, 3));
    }

    #[test]
    fn test_effective_price_clamps_discount() {
        let product = Product {
            discount: Some(150),
            ..bananas()
        };
        assert_eq!(product.effective_price(), Decimal::ZERO);
    }

    #[test]
    fn test_category_round_trips_through_str() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_category_serde_tag() {
        let json = serde_json::to_string(&Category::Dairy).unwrap();
        assert_eq!(json, "\"dairy\"");
    }
}
