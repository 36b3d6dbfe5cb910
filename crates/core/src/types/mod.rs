//! Core types for GreenBasket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod address;
pub mod id;
pub mod order;
pub mod product;
pub mod status;

pub use address::{Address, AddressError};
pub use id::*;
pub use order::Order;
pub use product::{Category, Product};
pub use status::*;
