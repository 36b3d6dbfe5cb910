//! GreenBasket Core - Shared domain library.
//!
//! This crate provides the domain model and the deterministic logic shared
//! across GreenBasket components:
//! - `storefront` - Public-facing grocery storefront API
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Everything here is deterministic and testable
//! without a running service:
//!
//! - [`types`] - Ids, products, addresses, orders, and statuses
//! - [`cart`] - The cart aggregate (line merging, derived totals)
//! - [`pricing`] - The single pricing policy (tax, delivery fee, total)
//! - [`checkout`] - The checkout session state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod pricing;
pub mod types;

pub use cart::{Cart, CartLine};
pub use checkout::{CheckoutError, CheckoutSession, CheckoutState};
pub use pricing::PricingBreakdown;
pub use types::*;
