//! Order pricing policy.
//!
//! [`PricingBreakdown::for_subtotal`] is the single place totals are computed.
//! Every surface that shows or persists a total (cart view, checkout view,
//! submitted order) goes through it, so the figure a customer sees before
//! checkout is bit-identical to the one stored on the order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Sales tax rate applied to the subtotal (8%).
pub const TAX_RATE: Decimal = Decimal::from_parts(8, 0, 0, false, 2);

/// Flat delivery fee charged below the free-delivery threshold.
pub const DELIVERY_FEE: Decimal = Decimal::from_parts(599, 0, 0, false, 2);

/// Subtotals strictly greater than this ship free.
pub const FREE_DELIVERY_THRESHOLD: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// The derived money figures for an order: subtotal, tax, delivery fee, total.
///
/// Always recomputed from a subtotal, never stored independently of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    #[serde(rename = "deliveryFee")]
    pub delivery_fee: Decimal,
    pub total: Decimal,
}

impl PricingBreakdown {
    /// Compute the breakdown for a cart subtotal.
    ///
    /// The delivery fee is waived only when the subtotal is *strictly*
    /// greater than [`FREE_DELIVERY_THRESHOLD`]; a subtotal of exactly 50.00
    /// still pays delivery.
    ///
    /// A negative subtotal is a caller bug: cart subtotals are sums of
    /// non-negative line totals.
    #[must_use]
    pub fn for_subtotal(subtotal: Decimal) -> Self {
        debug_assert!(subtotal >= Decimal::ZERO);

        let tax = subtotal * TAX_RATE;
        let delivery_fee = if subtotal > FREE_DELIVERY_THRESHOLD {
            Decimal::ZERO
        } else {
            DELIVERY_FEE
        };

        Self {
            subtotal,
            tax,
            delivery_fee,
            total: subtotal + tax + delivery_fee,
        }
    }
}
