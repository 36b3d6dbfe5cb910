//! Checkout orchestration.
//!
//! Drives the [`CheckoutSession`] state machine around the order gateway
//! call: one pricing breakdown, one line snapshot, and the cart is cleared
//! only after the gateway accepts the order. A gateway failure rolls the
//! session back to `AddressConfirmed` with the cart and address untouched,
//! so placing an order is always safely retryable.

use tracing::instrument;

use greenbasket_core::{
    Address, Cart, CheckoutError, CheckoutSession, Order, PaymentMethod, PricingBreakdown, UserId,
};

use crate::docstore::{DocStoreError, NewOrder, OrderGateway, ProfileGateway};
use crate::error::AppError;

/// User-facing message stored on the session after a failed submission.
pub const SUBMIT_FAILED_MESSAGE: &str =
    "There was a problem placing your order. Please try again.";

/// Errors from placing an order.
#[derive(Debug, thiserror::Error)]
pub enum PlaceOrderError {
    /// The checkout session was not in a placeable state.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    /// The order gateway rejected or failed the submission.
    #[error("order submission failed: {0}")]
    Gateway(#[from] DocStoreError),
}

impl From<PlaceOrderError> for AppError {
    fn from(err: PlaceOrderError) -> Self {
        match err {
            PlaceOrderError::Checkout(e) => Self::Checkout(e),
            PlaceOrderError::Gateway(e) => Self::Gateway(e),
        }
    }
}

/// Confirm the delivery address for a checkout session.
///
/// The address is also persisted to the user's profile, but only
/// best-effort: a profile write failure is logged and never blocks the
/// checkout.
///
/// # Errors
///
/// Returns a [`CheckoutError`] when the session no longer accepts an
/// address (submission started or already completed).
pub async fn confirm_address<P: ProfileGateway>(
    profiles: &P,
    user_id: &UserId,
    checkout: &mut CheckoutSession,
    address: Address,
) -> Result<(), CheckoutError> {
    checkout.confirm_address(address.clone())?;

    if let Err(err) = profiles.save_address(user_id, &address).await {
        tracing::warn!(error = %err, user_id = %user_id, "Failed to save profile address");
    }

    Ok(())
}

/// Place the order for the current cart and checkout session.
///
/// On success the cart is cleared and the session completes. On gateway
/// failure the cart is left untouched and the session returns to
/// `AddressConfirmed` with [`SUBMIT_FAILED_MESSAGE`] retained for display.
///
/// # Errors
///
/// - [`PlaceOrderError::Checkout`] when the session is not in
///   `AddressConfirmed` or the cart is empty.
/// - [`PlaceOrderError::Gateway`] when the order gateway fails.
#[instrument(skip_all, fields(user_id = %user_id))]
pub async fn place_order<G: OrderGateway>(
    gateway: &G,
    user_id: UserId,
    cart: &mut Cart,
    checkout: &mut CheckoutSession,
) -> Result<Order, PlaceOrderError> {
    let delivery_address = checkout.begin_submission(cart)?;
    let pricing = PricingBreakdown::for_subtotal(cart.subtotal());

    let new_order = NewOrder {
        user_id,
        items: cart.lines().to_vec(),
        pricing,
        delivery_address,
        payment_method: PaymentMethod::CashOnDelivery,
    };

    match gateway.submit(new_order).await {
        Ok(order) => {
            cart.clear();
            checkout.complete()?;
            tracing::info!(order_id = %order.id, total = %order.pricing.total, "Order placed");
            Ok(order)
        }
        Err(err) => {
            tracing::warn!(error = %err, "Order submission failed");
            checkout.fail_submission(SUBMIT_FAILED_MESSAGE)?;
            Err(err.into())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use rust_decimal::Decimal;

    use greenbasket_core::{Category, CheckoutState, OrderId, OrderStatus, Product, ProductId};

    use super::*;

    struct FakeOrders {
        fail: bool,
        submissions: Mutex<u32>,
    }

    impl FakeOrders {
        fn accepting() -> Self {
            Self {
                fail: false,
                submissions: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                submissions: Mutex::new(0),
            }
        }

        fn submission_count(&self) -> u32 {
            *self.submissions.lock().unwrap()
        }
    }

    impl OrderGateway for FakeOrders {
        async fn submit(&self, new_order: NewOrder) -> Result<Order, DocStoreError> {
            *self.submissions.lock().unwrap() += 1;
            if self.fail {
                return Err(DocStoreError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            Ok(Order {
                id: OrderId::new("order-1"),
                user_id: new_order.user_id,
                items: new_order.items,
                pricing: new_order.pricing,
                status: OrderStatus::Pending,
                created_at: Utc::now(),
                delivery_address: new_order.delivery_address,
                payment_method: new_order.payment_method,
                estimated_delivery: None,
            })
        }

        async fn list_for_user(&self, _user_id: &UserId) -> Result<Vec<Order>, DocStoreError> {
            Ok(Vec::new())
        }
    }

    struct FakeProfiles {
        fail: bool,
        saved: Mutex<Option<Address>>,
    }

    impl FakeProfiles {
        fn working() -> Self {
            Self {
                fail: false,
                saved: Mutex::new(None),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                saved: Mutex::new(None),
            }
        }
    }

    impl ProfileGateway for FakeProfiles {
        async fn address(&self, _user_id: &UserId) -> Result<Option<Address>, DocStoreError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save_address(
            &self,
            _user_id: &UserId,
            address: &Address,
        ) -> Result<(), DocStoreError> {
            if self.fail {
                return Err(DocStoreError::Api {
                    status: 500,
                    message: "write failed".to_string(),
                });
            }
            *self.saved.lock().unwrap() = Some(address.clone());
            Ok(())
        }
    }

    fn address() -> Address {
        Address::new("123 Main St", "New York", "NY", "10001", "USA").unwrap()
    }

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

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(product("a", Decimal::new(299, 2)), 2);
        cart.add_item(product("b", Decimal::new(199, 2)), 1);
        cart
    }

    fn confirmed_session() -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.confirm_address(address()).unwrap();
        session
    }

    #[tokio::test]
    async fn test_place_order_clears_cart_and_completes() {
        let gateway = FakeOrders::accepting();
        let mut cart = cart();
        let mut session = confirmed_session();
        let expected = PricingBreakdown::for_subtotal(cart.subtotal());

        let order = place_order(&gateway, UserId::new("user-1"), &mut cart, &mut session)
            .await
            .unwrap();

        assert!(cart.is_empty());
        assert!(session.is_completed());
        assert_eq!(order.status, OrderStatus::Pending);
        // The persisted figures are the ones the customer was shown.
        assert_eq!(order.pricing, expected);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.delivery_address, address());
    }

    #[tokio::test]
    async fn test_gateway_failure_preserves_cart_and_returns_to_confirmed() {
        let gateway = FakeOrders::failing();
        let mut cart = cart();
        let before = cart.clone();
        let mut session = confirmed_session();

        let err = place_order(&gateway, UserId::new("user-1"), &mut cart, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(err, PlaceOrderError::Gateway(_)));
        assert_eq!(cart, before);
        assert_eq!(session.state(), CheckoutState::AddressConfirmed);
        assert_eq!(session.error(), Some(SUBMIT_FAILED_MESSAGE));

        // The same session retries cleanly once the gateway recovers.
        let gateway = FakeOrders::accepting();
        place_order(&gateway, UserId::new("user-1"), &mut cart, &mut session)
            .await
            .unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_empty_cart_never_submits() {
        let gateway = FakeOrders::accepting();
        let mut cart = Cart::new();
        let mut session = confirmed_session();

        let err = place_order(&gateway, UserId::new("user-1"), &mut cart, &mut session)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PlaceOrderError::Checkout(CheckoutError::EmptyCart)
        ));
        assert_eq!(gateway.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_confirm_address_saves_profile() {
        let profiles = FakeProfiles::working();
        let mut session = CheckoutSession::new();

        confirm_address(&profiles, &UserId::new("user-1"), &mut session, address())
            .await
            .unwrap();

        assert_eq!(session.state(), CheckoutState::AddressConfirmed);
        assert_eq!(
            profiles.address(&UserId::new("user-1")).await.unwrap(),
            Some(address())
        );
    }

    #[tokio::test]
    async fn test_profile_save_failure_does_not_block_checkout() {
        let profiles = FakeProfiles::failing();
        let mut session = CheckoutSession::new();

        confirm_address(&profiles, &UserId::new("user-1"), &mut session, address())
            .await
            .unwrap();

        assert_eq!(session.state(), CheckoutState::AddressConfirmed);
        assert_eq!(session.address(), Some(&address()));
    }
}
