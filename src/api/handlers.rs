//! API Handlers
//!
//! HTTP request handlers for the catalog endpoints. Reads go through the
//! query cache; writes go to the repository and then invalidate the cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    Json,
};
use tracing::info;

use crate::cache::MemoryStore;
use crate::catalog::{
    Filters, InvalidationScope, PaginationMetadata, Product, ProductQueryCache,
    ProductRepository,
};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::models::{
    CreateProductRequest, DeleteResponse, HealthResponse, ProductsQuery, StatsResponse,
    UpdateProductRequest,
};

/// Response header carrying the listing's pagination metadata as JSON.
pub const PAGINATION_HEADER: &str = "pagination";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache in front of the catalog
    pub cache: Arc<ProductQueryCache>,
    /// Source of truth, used for writes
    pub catalog: Arc<dyn ProductRepository>,
    /// Store backing the cache, kept for stats and the expiry sweep
    pub store: Arc<MemoryStore>,
    /// Deadline for each request's catalog work, `None` for no limit
    pub request_timeout: Option<Duration>,
}

impl AppState {
    /// Creates a new AppState over `store` and `catalog` with default TTLs.
    pub fn new<C>(store: Arc<MemoryStore>, catalog: Arc<C>) -> Self
    where
        C: ProductRepository + 'static,
    {
        Self::from_parts(store, catalog, &Config::default())
    }

    /// Creates a new AppState from configuration.
    pub fn from_config<C>(config: &Config, store: Arc<MemoryStore>, catalog: Arc<C>) -> Self
    where
        C: ProductRepository + 'static,
    {
        Self::from_parts(store, catalog, config)
    }

    fn from_parts<C>(store: Arc<MemoryStore>, catalog: Arc<C>, config: &Config) -> Self
    where
        C: ProductRepository + 'static,
    {
        let cache = ProductQueryCache::new(store.clone(), catalog.clone())
            .with_ttls(config.cache_ttls())
            .with_store_timeout(config.store_timeout());

        Self {
            cache: Arc::new(cache),
            catalog,
            store,
            request_timeout: config.request_timeout(),
        }
    }
}

/// Runs `work` under the request deadline, if any.
async fn with_deadline<T, F>(limit: Option<Duration>, what: &str, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, work)
            .await
            .map_err(|_| CatalogError::Timeout(what.to_string()))?,
        None => work.await,
    }
}

fn pagination_headers(metadata: &PaginationMetadata) -> Result<HeaderMap> {
    let json = serde_json::to_string(metadata)?;
    let value = HeaderValue::from_str(&json)
        .map_err(|e| CatalogError::Internal(format!("invalid pagination header: {}", e)))?;

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(PAGINATION_HEADER), value);
    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(PAGINATION_HEADER),
    );
    Ok(headers)
}

/// Handler for GET /api/products
///
/// Returns one page of products; the metadata travels in the `Pagination`
/// header.
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<(HeaderMap, Json<Vec<Product>>)> {
    let params = query.to_params();
    let page = with_deadline(
        state.request_timeout,
        "product listing",
        state.cache.get_page(&params),
    )
    .await?;

    let headers = pagination_headers(&page.metadata)?;
    Ok((headers, Json(page.items)))
}

/// Handler for GET /api/products/:id
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let product = with_deadline(
        state.request_timeout,
        "product lookup",
        state.cache.get_product(id),
    )
    .await?;

    product
        .map(Json)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}

/// Handler for GET /api/products/filters
pub async fn filters_handler(State(state): State<AppState>) -> Result<Json<Filters>> {
    let filters = with_deadline(
        state.request_timeout,
        "product filters",
        state.cache.get_filters(),
    )
    .await?;

    Ok(Json(filters))
}

/// Handler for POST /api/products
pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, HeaderMap, Json<Product>)> {
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::InvalidRequest(error_msg));
    }

    let product = with_deadline(
        state.request_timeout,
        "product create",
        state.catalog.create(req.into_new_product()),
    )
    .await?;
    info!(id = product.id, "Product created");

    state.cache.invalidate(InvalidationScope::Created).await;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/api/products/{}", product.id))
        .map_err(|e| CatalogError::Internal(e.to_string()))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(product)))
}

/// Handler for PUT /api/products
pub async fn update_product_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<StatusCode> {
    if let Some(error_msg) = req.validate() {
        return Err(CatalogError::InvalidRequest(error_msg));
    }

    let id = req.id;
    let updated = with_deadline(
        state.request_timeout,
        "product update",
        state.catalog.update(req.into_product()),
    )
    .await?;

    if updated.is_none() {
        return Err(CatalogError::NotFound(id.to_string()));
    }
    info!(id, "Product updated");

    state.cache.invalidate(InvalidationScope::Updated(id)).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /api/products/:id
pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    let removed = with_deadline(
        state.request_timeout,
        "product delete",
        state.catalog.delete(id),
    )
    .await?;

    if !removed {
        return Err(CatalogError::NotFound(id.to_string()));
    }
    info!(id, "Product deleted");

    state.cache.invalidate(InvalidationScope::Deleted(id)).await;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /stats
///
/// Returns cache counters and the store's entry count.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let total_entries = state.store.len().await;
    Json(StatsResponse::new(state.cache.stats(), total_entries))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
