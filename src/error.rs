//! Error types for the catalog cache
//!
//! Provides unified error handling using thiserror. Store failures and
//! catalog failures are kept apart: the former only ever slow a request
//! down, the latter are surfaced to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Failure of the key-value store backing the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store cannot be reached
    #[error("Store unavailable")]
    Unavailable,

    /// Store call did not finish within the configured deadline
    #[error("Store operation timed out: {0}")]
    Timeout(String),

    /// Key is empty or too long
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value exceeds the store's size limit
    #[error("Value too large: {0} bytes")]
    ValueTooLarge(usize),

    /// Any other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Convenience Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Catalog Error Enum ==
/// Unified error type for catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Product not found
    #[error("Product not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The source of truth failed
    #[error("Query source error: {0}")]
    Source(String),

    /// Request deadline elapsed
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Envelope encoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = match &self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CatalogError::Source(_) => StatusCode::BAD_GATEWAY,
            CatalogError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            CatalogError::Serialization(_) | CatalogError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
