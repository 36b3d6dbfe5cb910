//! Document-store API clients.
//!
//! # Architecture
//!
//! - The document store is source of truth for products, orders, and user
//!   profiles - NO local sync, direct API calls
//! - One shared [`DocStoreClient`] wraps `reqwest` and the api-key header;
//!   the per-collection gateways ([`CatalogClient`], [`OrderClient`],
//!   [`ProfileClient`]) are thin facades over it
//! - In-memory caching via `moka` for catalog responses (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use greenbasket_storefront::docstore::{CatalogClient, DocStoreClient, ProductFilter};
//!
//! let docstore = DocStoreClient::new(&config.docstore);
//! let catalog = CatalogClient::new(docstore.clone());
//!
//! // Get a product
//! let product = catalog.get(&ProductId::new("prod-1")).await?;
//!
//! // List a category
//! let filter = ProductFilter {
//!     category: Some(Category::Fruits),
//!     ..ProductFilter::default()
//! };
//! let products = catalog.list(&filter).await?;
//! ```

mod catalog;
mod orders;
mod profiles;

pub use catalog::{CatalogClient, ProductFilter};
pub use orders::{NewOrder, OrderClient, OrderGateway};
pub use profiles::{ProfileClient, ProfileGateway};

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use crate::config::DocStoreConfig;

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum DocStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Envelope returned by collection queries.
#[derive(Debug, serde::Deserialize)]
struct DocumentList<T> {
    documents: Vec<T>,
}

/// Client for the document-store API.
///
/// Cheaply cloneable; all gateways share one connection pool.
#[derive(Clone)]
pub struct DocStoreClient {
    inner: Arc<DocStoreClientInner>,
}

struct DocStoreClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DocStoreClient {
    /// Create a new document-store client.
    #[must_use]
    pub fn new(config: &DocStoreConfig) -> Self {
        Self {
            inner: Arc::new(DocStoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                api_key: config.api_key.expose_secret().to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.inner.base_url)
    }

    /// Read the response body, mapping non-success statuses to errors.
    async fn read_body(
        response: reqwest::Response,
        what: &str,
    ) -> Result<String, DocStoreError> {
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DocStoreError::NotFound(what.to_string()));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Document store returned non-success status"
            );
            return Err(DocStoreError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        Ok(body)
    }

    /// Fetch a single document by id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the document is absent, or other
    /// [`DocStoreError`] values on transport and parse failures.
    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    pub async fn get_document<T: DeserializeOwned>(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<T, DocStoreError> {
        let what = format!("{collection}/{id}");
        let response = self
            .inner
            .client
            .get(self.url(&what))
            .header("X-Api-Key", &self.inner.api_key)
            .send()
            .await?;

        let body = Self::read_body(response, &what).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Query a collection with filter parameters.
    ///
    /// # Errors
    ///
    /// Returns a [`DocStoreError`] on transport and parse failures.
    #[instrument(skip(self, params), fields(collection = %collection))]
    pub async fn query<T: DeserializeOwned>(
        &self,
        collection: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, DocStoreError> {
        let response = self
            .inner
            .client
            .get(self.url(collection))
            .query(params)
            .header("X-Api-Key", &self.inner.api_key)
            .send()
            .await?;

        let body = Self::read_body(response, collection).await?;
        let list: DocumentList<T> = serde_json::from_str(&body)?;
        Ok(list.documents)
    }

    /// Create or replace a document.
    ///
    /// # Errors
    ///
    /// Returns a [`DocStoreError`] on transport failures or non-success
    /// statuses.
    #[instrument(skip(self, document), fields(collection = %collection, id = %id))]
    pub async fn put_document<T: Serialize + Sync>(
        &self,
        collection: &str,
        id: &str,
        document: &T,
    ) -> Result<(), DocStoreError> {
        let what = format!("{collection}/{id}");
        let response = self
            .inner
            .client
            .put(self.url(&what))
            .header("X-Api-Key", &self.inner.api_key)
            .json(document)
            .send()
            .await?;

        Self::read_body(response, &what).await?;
        Ok(())
    }

    /// Merge fields into an existing document, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`DocStoreError`] on transport failures or non-success
    /// statuses.
    #[instrument(skip(self, patch), fields(collection = %collection, id = %id))]
    pub async fn patch_document(
        &self,
        collection: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<(), DocStoreError> {
        let what = format!("{collection}/{id}");
        let response = self
            .inner
            .client
            .patch(self.url(&what))
            .header("X-Api-Key", &self.inner.api_key)
            .json(patch)
            .send()
            .await?;

        Self::read_body(response, &what).await?;
        Ok(())
    }

    /// Liveness probe against the document store.
    ///
    /// # Errors
    ///
    /// Returns a [`DocStoreError`] when the store is unreachable or unhealthy.
    pub async fn ping(&self) -> Result<(), DocStoreError> {
        let response = self
            .inner
            .client
            .get(self.url("ping"))
            .header("X-Api-Key", &self.inner.api_key)
            .send()
            .await?;

        Self::read_body(response, "ping").await?;
        Ok(())
    }
}
