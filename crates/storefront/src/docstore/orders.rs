//! Order gateway backed by the `orders` collection.

use chrono::{Duration, Utc};
use tracing::instrument;
use uuid::Uuid;

use greenbasket_core::{
    Address, CartLine, Order, OrderId, OrderStatus, PaymentMethod, PricingBreakdown, UserId,
};

use super::{DocStoreClient, DocStoreError};

/// Days between order placement and the estimated delivery date.
const ESTIMATED_DELIVERY_DAYS: i64 = 3;

/// Everything needed to place an order.
///
/// The line snapshot and the address are copies; nothing here references
/// live cart or profile state.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub items: Vec<CartLine>,
    pub pricing: PricingBreakdown,
    pub delivery_address: Address,
    pub payment_method: PaymentMethod,
}

/// The order-gateway contract the checkout workflow depends on.
///
/// The production implementation is [`OrderClient`]; tests substitute
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait OrderGateway {
    /// Persist a new order and return it with its generated id, `pending`
    /// status, and estimated delivery date.
    async fn submit(&self, new_order: NewOrder) -> Result<Order, DocStoreError>;

    /// List a user's orders, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, DocStoreError>;
}

/// Gateway for order writes and history reads.
#[derive(Clone)]
pub struct OrderClient {
    docstore: DocStoreClient,
}

impl OrderClient {
    const COLLECTION: &'static str = "orders";

    /// Create a new order gateway.
    #[must_use]
    pub const fn new(docstore: DocStoreClient) -> Self {
        Self { docstore }
    }
}

impl OrderGateway for OrderClient {
    /// Persist a new order document.
    ///
    /// The gateway assigns the id, stamps `created_at`, sets the initial
    /// `pending` status, and computes the estimated delivery date
    /// (placement time plus three days).
    #[instrument(skip(self, new_order), fields(user_id = %new_order.user_id))]
    async fn submit(&self, new_order: NewOrder) -> Result<Order, DocStoreError> {
        let created_at = Utc::now();
        let order = Order {
            id: OrderId::new(Uuid::new_v4().to_string()),
            user_id: new_order.user_id,
            items: new_order.items,
            pricing: new_order.pricing,
            status: OrderStatus::Pending,
            created_at,
            delivery_address: new_order.delivery_address,
            payment_method: new_order.payment_method,
            estimated_delivery: Some(created_at + Duration::days(ESTIMATED_DELIVERY_DAYS)),
        };

        self.docstore
            .put_document(Self::COLLECTION, order.id.as_str(), &order)
            .await?;

        Ok(order)
    }

    /// List a user's orders, newest first.
    ///
    /// Sorted here rather than trusting store-side ordering, so the
    /// newest-first contract holds for any backend.
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, DocStoreError> {
        let mut orders: Vec<Order> = self
            .docstore
            .query(
                Self::COLLECTION,
                &[("userId", user_id.as_str().to_string())],
            )
            .await?;

        sort_newest_first(&mut orders);
        Ok(orders)
    }
}

/// Sort orders newest-first by creation time.
fn sort_newest_first(orders: &mut [Order]) {
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}
