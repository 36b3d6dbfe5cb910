//! Catalog gateway backed by the `products` collection.

use std::time::Duration;

use moka::future::Cache;
use tracing::{debug, instrument};

use greenbasket_core::{Category, Product, ProductId};

use super::{DocStoreClient, DocStoreError};

/// Filters for a catalog listing.
///
/// All filters are optional and combinable; when both a category and a
/// search term are given, both apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Restrict to one category.
    pub category: Option<Category>,
    /// Free-text search over name and description.
    pub search: Option<String>,
    /// Only featured products (home page rail).
    pub featured: bool,
}

impl ProductFilter {
    /// Query-string parameters for the document-store request.
    fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if self.featured {
            params.push(("featured", "true".to_string()));
        }
        params
    }

    /// Cache key for this filter, or `None` when the result must not be
    /// cached (search results are too varied to be worth keeping).
    fn cache_key(&self) -> Option<String> {
        if self.search.is_some() {
            return None;
        }
        let category = self.category.map_or("", Category::as_str);
        Some(format!("products:{category}:{}", self.featured))
    }
}

/// Cached catalog value types.
#[derive(Debug, Clone)]
enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
}

/// Gateway for catalog reads.
///
/// Products and listings are cached for 5 minutes; search queries bypass
/// the cache.
#[derive(Clone)]
pub struct CatalogClient {
    docstore: DocStoreClient,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    const COLLECTION: &'static str = "products";

    /// Create a new catalog gateway.
    #[must_use]
    pub fn new(docstore: DocStoreClient) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self { docstore, cache }
    }

    /// List products matching a filter.
    ///
    /// # Errors
    ///
    /// Returns a [`DocStoreError`] if the API request fails.
    #[instrument(skip(self))]
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, DocStoreError> {
        let cache_key = filter.cache_key();

        if let Some(key) = &cache_key
            && let Some(CacheValue::Products(products)) = self.cache.get(key).await
        {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .docstore
            .query(Self::COLLECTION, &filter.query_params())
            .await?;

        if let Some(key) = cache_key {
            self.cache
                .insert(key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns `DocStoreError::NotFound` if the product is absent, or
    /// another [`DocStoreError`] if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get(&self, product_id: &ProductId) -> Result<Product, DocStoreError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .docstore
            .get_document(Self::COLLECTION, product_id.as_str())
            .await?;

        self.cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }
}
