//! Catalog Module
//!
//! Product model, cache key derivation, cached envelopes, the query source
//! contract and the cache-aside [`ProductQueryCache`].

pub mod envelope;
pub mod key;
mod product;
mod query_cache;
mod source;
mod stats;


// Re-export public types
pub use envelope::{CachedFilters, CachedPage, CachedProduct, Envelope};
pub use key::{derive_key, product_key, FILTERS_KEY};
pub use product::{
    Filters, NewProduct, OrderBy, Page, PaginationMetadata, Product, ProductQueryParams,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use query_cache::{CacheTtls, InvalidationReport, InvalidationScope, ProductQueryCache};
pub use source::{sample_products, InMemoryCatalog, ProductRepository, QuerySource};
pub use stats::CacheStats;
