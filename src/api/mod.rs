//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET /api/products` - Paginated listing, metadata in the `Pagination` header
//! - `GET /api/products/:id` - Single product
//! - `GET /api/products/filters` - Distinct brands and types
//! - `POST /api/products`, `PUT /api/products`, `DELETE /api/products/:id` - Writes
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
