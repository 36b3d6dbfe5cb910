//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use greenbasket_core::UserId;

use crate::identity::AuthUser;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identity-provider user id.
    pub id: UserId,
    /// User's email address.
    pub email: String,
    /// Display name shown in the account menu.
    pub display_name: String,
    /// Profile photo URL, if the provider has one.
    pub photo_url: Option<String>,
}

impl From<AuthUser> for CurrentUser {
    fn from(user: AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            photo_url: user.photo_url,
        }
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the persisted cart line array.
    pub const CART: &str = "cart";

    /// Key for the in-progress checkout session.
    pub const CHECKOUT: &str = "checkout";
}
