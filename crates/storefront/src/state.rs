//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::docstore::{CatalogClient, DocStoreClient, OrderClient, ProfileClient};
use crate::identity::IdentityClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the gateway clients and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    docstore: DocStoreClient,
    catalog: CatalogClient,
    orders: OrderClient,
    profiles: ProfileClient,
    identity: IdentityClient,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let docstore = DocStoreClient::new(&config.docstore);
        let catalog = CatalogClient::new(docstore.clone());
        let orders = OrderClient::new(docstore.clone());
        let profiles = ProfileClient::new(docstore.clone());
        let identity = IdentityClient::new(&config.identity);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                docstore,
                catalog,
                orders,
                profiles,
                identity,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared document-store client.
    #[must_use]
    pub fn docstore(&self) -> &DocStoreClient {
        &self.inner.docstore
    }

    /// Get a reference to the catalog gateway.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the order gateway.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }

    /// Get a reference to the profile gateway.
    #[must_use]
    pub fn profiles(&self) -> &ProfileClient {
        &self.inner.profiles
    }

    /// Get a reference to the identity-provider client.
    #[must_use]
    pub fn identity(&self) -> &IdentityClient {
        &self.inner.identity
    }
}
