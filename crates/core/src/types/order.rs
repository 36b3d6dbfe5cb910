//! Placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::pricing::PricingBreakdown;
use crate::types::address::Address;
use crate::types::id::{OrderId, UserId};
use crate::types::status::{OrderStatus, PaymentMethod};

/// A placed order.
///
/// Created once at checkout completion and immutable afterwards from this
/// system's perspective; status transitions are applied by the external
/// fulfillment system. Both the cart lines and the delivery address are
/// snapshots, so later catalog or profile edits never change a historical
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    /// The figures the customer was shown at checkout, persisted verbatim.
    #[serde(flatten)]
    pub pricing: PricingBreakdown,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub delivery_address: Address,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn test_order_serializes_breakdown_flat() {
        let order = Order {
            id: OrderId::new("order-1"),
            user_id: UserId::new("user-1"),
            items: Vec::new(),
            pricing: PricingBreakdown::for_subtotal(Decimal::new(50, 0)),
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            delivery_address: Address::new("123 Main St", "New York", "NY", "10001", "USA")
                .unwrap(),
            payment_method: PaymentMethod::CashOnDelivery,
            estimated_delivery: None,
        };

        let value = serde_json::to_value(&order).unwrap();
        // The breakdown fields sit directly on the order document.
        assert!(value.get("subtotal").is_some());
        assert!(value.get("deliveryFee").is_some());
        assert!(value.get("total").is_some());
        assert_eq!(value["status"], "pending");
        assert_eq!(value["paymentMethod"], "cash_on_delivery");

        let back: Order = serde_json::from_value(value).unwrap();
        assert_eq!(back, order);
    }
}
