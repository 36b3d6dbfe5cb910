//! User-profile gateway backed by the `users` collection.
//!
//! Profiles are owned by the identity provider; the storefront only reads
//! and merges the saved delivery address.

use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use greenbasket_core::{Address, UserId};

use super::{DocStoreClient, DocStoreError};

/// The profile-gateway contract the checkout workflow depends on.
///
/// The production implementation is [`ProfileClient`]; tests substitute
/// in-memory fakes.
#[allow(async_fn_in_trait)]
pub trait ProfileGateway {
    /// The user's saved delivery address, if any.
    async fn address(&self, user_id: &UserId) -> Result<Option<Address>, DocStoreError>;

    /// Save the user's delivery address, merging into the profile document.
    async fn save_address(&self, user_id: &UserId, address: &Address)
    -> Result<(), DocStoreError>;
}

/// The slice of a profile document the storefront reads.
#[derive(Debug, Deserialize)]
struct ProfileDocument {
    #[serde(default)]
    address: Option<Address>,
}

/// Gateway for profile reads and address persistence.
#[derive(Clone)]
pub struct ProfileClient {
    docstore: DocStoreClient,
}

impl ProfileClient {
    const COLLECTION: &'static str = "users";

    /// Create a new profile gateway.
    #[must_use]
    pub const fn new(docstore: DocStoreClient) -> Self {
        Self { docstore }
    }
}

impl ProfileGateway for ProfileClient {
    /// The user's saved delivery address, if any.
    ///
    /// A missing profile document is not an error - new users simply have
    /// no saved address yet.
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn address(&self, user_id: &UserId) -> Result<Option<Address>, DocStoreError> {
        match self
            .docstore
            .get_document::<ProfileDocument>(Self::COLLECTION, user_id.as_str())
            .await
        {
            Ok(profile) => Ok(profile.address),
            Err(DocStoreError::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Merge the address into the user's profile document.
    #[instrument(skip(self, address), fields(user_id = %user_id))]
    async fn save_address(
        &self,
        user_id: &UserId,
        address: &Address,
    ) -> Result<(), DocStoreError> {
        self.docstore
            .patch_document(
                Self::COLLECTION,
                user_id.as_str(),
                &json!({ "address": address }),
            )
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_document_without_address() {
        let profile: ProfileDocument =
            serde_json::from_str(r#"{"email": "user@example.com"}"#).unwrap();
        assert!(profile.address.is_none());
    }

    #[test]
    fn test_profile_document_with_address() {
        let profile: ProfileDocument = serde_json::from_str(
            r#"{
                "address": {
                    "street": "123 Main St",
                    "city": "New York",
                    "state": "NY",
                    "zipCode": "10001",
                    "country": "USA"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(profile.address.unwrap().city, "New York");
    }
}
