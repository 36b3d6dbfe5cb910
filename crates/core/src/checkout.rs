//! Checkout session state machine.
//!
//! A [`CheckoutSession`] tracks one checkout flow from address entry to
//! order submission:
//!
//! ```text
//! AwaitingAddress -> AddressConfirmed -> Submitting -> Completed
//!                         ^                  |
//!                         +------------------+  (submission failure)
//! ```
//!
//! The failure edge is recoverable: a failed submission returns to
//! `AddressConfirmed` with the address and an error message retained, so the
//! customer can retry without re-entering anything. The machine is pure -
//! callers perform the actual gateway call between [`begin_submission`] and
//! [`complete`]/[`fail_submission`].
//!
//! [`begin_submission`]: CheckoutSession::begin_submission
//! [`complete`]: CheckoutSession::complete
//! [`fail_submission`]: CheckoutSession::fail_submission

use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::types::Address;

/// Errors raised by invalid checkout transitions.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines; an empty order can never be placed.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// Submission was requested before an address was confirmed.
    #[error("no delivery address confirmed")]
    MissingAddress,

    /// The requested transition is not valid from the current state.
    #[error("invalid checkout transition from {from}")]
    InvalidTransition {
        /// The state the session was in.
        from: CheckoutState,
    },
}

/// The states a checkout session moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutState {
    AwaitingAddress,
    AddressConfirmed,
    Submitting,
    Completed,
}

impl std::fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Self::AwaitingAddress => "awaiting_address",
            Self::AddressConfirmed => "address_confirmed",
            Self::Submitting => "submitting",
            Self::Completed => "completed",
        };
        f.write_str(tag)
    }
}

/// One checkout flow, persisted in the session between requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    state: CheckoutState,
    address: Option<Address>,
    /// Message from the most recent failed submission, cleared on retry.
    error: Option<String>,
}

impl CheckoutSession {
    /// Start a new session awaiting an address.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: CheckoutState::AwaitingAddress,
            address: None,
            error: None,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CheckoutState {
        self.state
    }

    /// The confirmed address, if any.
    #[must_use]
    pub const fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// Message from the most recent failed submission.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the session has reached its terminal state.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.state, CheckoutState::Completed)
    }

    /// Confirm a delivery address.
    ///
    /// Valid from `AwaitingAddress` and from `AddressConfirmed` (the
    /// customer may edit the address up until the order is placed).
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] once submission has
    /// started or the session has completed.
    pub fn confirm_address(&mut self, address: Address) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::AwaitingAddress | CheckoutState::AddressConfirmed => {
                self.address = Some(address);
                self.state = CheckoutState::AddressConfirmed;
                Ok(())
            }
            from @ (CheckoutState::Submitting | CheckoutState::Completed) => {
                Err(CheckoutError::InvalidTransition { from })
            }
        }
    }

    /// Move to `Submitting`, returning the address the order will ship to.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] when the cart has no lines - an empty
    ///   cart can never reach `Submitting`.
    /// - [`CheckoutError::InvalidTransition`] unless the session is in
    ///   `AddressConfirmed`.
    pub fn begin_submission(&mut self, cart: &Cart) -> Result<Address, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        match self.state {
            CheckoutState::AddressConfirmed => {
                let address = self.address.clone().ok_or(CheckoutError::MissingAddress)?;
                self.state = CheckoutState::Submitting;
                self.error = None;
                Ok(address)
            }
            from => Err(CheckoutError::InvalidTransition { from }),
        }
    }

    /// Record a successful submission. The session is terminal afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless the session is in
    /// `Submitting`.
    pub fn complete(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Submitting => {
                self.state = CheckoutState::Completed;
                Ok(())
            }
            from => Err(CheckoutError::InvalidTransition { from }),
        }
    }

    /// Record a failed submission and return to `AddressConfirmed`.
    ///
    /// The address is retained and the message is surfaced via
    /// [`CheckoutSession::error`], so the customer can retry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless the session is in
    /// `Submitting`.
    pub fn fail_submission(&mut self, message: impl Into<String>) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Submitting => {
                self.state = CheckoutState::AddressConfirmed;
                self.error = Some(message.into());
                Ok(())
            }
            from => Err(CheckoutError::InvalidTransition { from }),
        }
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{Category, Product, ProductId};

    fn address() -> Address {
        Address::new("123 Main St", "New York", "NY", "10001", "USA").unwrap()
    }

    fn cart_with_one_item() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            Product {
                id: ProductId::new("1"),
                name: "Sourdough Bread".to_string(),
                description: String::new(),
                price: Decimal::new(449, 2),
                image: String::new(),
                category: Category::Bakery,
                subcategory: None,
                unit: "loaf".to_string(),
                stock: 15,
                discount: None,
                featured: None,
                organic: None,
            },
            1,
        );
        cart
    }

    #[test]
    fn test_happy_path() {
        let mut session = CheckoutSession::new();
        assert_eq!(session.state(), CheckoutState::AwaitingAddress);

        session.confirm_address(address()).unwrap();
        assert_eq!(session.state(), CheckoutState::AddressConfirmed);

        let shipping = session.begin_submission(&cart_with_one_item()).unwrap();
        assert_eq!(shipping, address());
        assert_eq!(session.state(), CheckoutState::Submitting);

        session.complete().unwrap();
        assert!(session.is_completed());
    }

    #[test]
    fn test_empty_cart_never_reaches_submitting() {
        let mut session = CheckoutSession::new();
        session.confirm_address(address()).unwrap();

        let err = session.begin_submission(&Cart::new()).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
        assert_eq!(session.state(), CheckoutState::AddressConfirmed);
    }

    #[test]
    fn test_submission_requires_confirmed_address() {
        let mut session = CheckoutSession::new();
        let err = session.begin_submission(&cart_with_one_item()).unwrap_err();
        assert_eq!(
            err,
            CheckoutError::InvalidTransition {
                from: CheckoutState::AwaitingAddress
            }
        );
    }

    #[test]
    fn test_failure_returns_to_address_confirmed_and_keeps_address() {
        let mut session = CheckoutSession::new();
        session.confirm_address(address()).unwrap();
        session.begin_submission(&cart_with_one_item()).unwrap();

        session.fail_submission("gateway unavailable").unwrap();
        assert_eq!(session.state(), CheckoutState::AddressConfirmed);
        assert_eq!(session.address(), Some(&address()));
        assert_eq!(session.error(), Some("gateway unavailable"));

        // Retry succeeds and clears the stored error.
        session.begin_submission(&cart_with_one_item()).unwrap();
        assert_eq!(session.error(), None);
        session.complete().unwrap();
    }

    #[test]
    fn test_address_editable_until_submission() {
        let mut session = CheckoutSession::new();
        session.confirm_address(address()).unwrap();

        let other = Address::new("9 Elm St", "Albany", "NY", "12207", "USA").unwrap();
        session.confirm_address(other.clone()).unwrap();
        assert_eq!(session.address(), Some(&other));

        session.begin_submission(&cart_with_one_item()).unwrap();
        assert!(session.confirm_address(address()).is_err());
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut session = CheckoutSession::new();
        session.confirm_address(address()).unwrap();
        session.begin_submission(&cart_with_one_item()).unwrap();
        session.complete().unwrap();

        assert!(session.confirm_address(address()).is_err());
        assert!(session.begin_submission(&cart_with_one_item()).is_err());
        assert!(session.complete().is_err());
        assert!(session.fail_submission("late failure").is_err());
    }
}
