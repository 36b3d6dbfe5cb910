//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use greenbasket_core::{Category, Product, ProductId};

use crate::docstore::ProductFilter;
use crate::error::Result;
use crate::state::AppState;

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    /// Restrict to one category.
    pub category: Option<Category>,
    /// Free-text search term.
    pub q: Option<String>,
    /// Only featured products.
    #[serde(default)]
    pub featured: bool,
}

/// Catalog listing response.
#[derive(Debug, Serialize)]
pub struct ProductListView {
    pub products: Vec<Product>,
}

/// List products, optionally filtered by category and/or search term.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<ProductListView>> {
    let filter = ProductFilter {
        category: query.category,
        search: query.q.filter(|q| !q.trim().is_empty()),
        featured: query.featured,
    };

    let products = state.catalog().list(&filter).await?;
    Ok(Json(ProductListView { products }))
}

/// Product detail by id. Responds 404 when the product is absent.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    let product = state.catalog().get(&id).await?;
    Ok(Json(product))
}
