//! Catalog Cache - A cache-aside layer for a paginated product catalog
//!
//! Serves product listings, single products and filter facets from a
//! key-value store, falling back to the catalog on a miss and sweeping
//! affected keys on every write.

pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use catalog::ProductQueryCache;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
