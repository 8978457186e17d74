//! Product Query Cache
//!
//! Cache-aside layer in front of the catalog query source. Reads try the
//! store first and fall back to the source on any kind of miss; writes to the
//! catalog are followed by an invalidation sweep.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::KeyValueStore;
use crate::catalog::envelope::{CachedFilters, CachedPage, CachedProduct, Envelope};
use crate::catalog::key::{derive_key, product_key, FILTERS_KEY, LISTING_PATTERN, SINGLE_PATTERN};
use crate::catalog::stats::{CacheStats, StatsRecorder};
use crate::catalog::{Filters, Page, Product, ProductQueryParams, QuerySource};
use crate::error::{Result, StoreError, StoreResult};

// == Cache TTLs ==
/// Time-to-live per class of cached query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Paginated listings
    pub listing: Duration,
    /// Single-product lookups
    pub single: Duration,
    /// Brand/type facets
    pub filters: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            listing: Duration::from_secs(10 * 60),
            single: Duration::from_secs(30 * 60),
            filters: Duration::from_secs(60 * 60),
        }
    }
}

// == Invalidation ==
/// What changed in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationScope {
    Created,
    Updated(i64),
    Deleted(i64),
    /// Drop every catalog key, single-product entries included.
    All,
}

/// Outcome of an invalidation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvalidationReport {
    pub keys_removed: u64,
    pub failures: usize,
}

// == Product Query Cache ==
/// Read-through cache over a [`QuerySource`].
///
/// Store failures never reach the caller: reads degrade to the source and
/// writes or deletes are logged and dropped. Source failures propagate.
pub struct ProductQueryCache {
    store: Arc<dyn KeyValueStore>,
    source: Arc<dyn QuerySource>,
    ttls: CacheTtls,
    store_timeout: Option<Duration>,
    stats: StatsRecorder,
}

impl ProductQueryCache {
    // == Constructor ==
    pub fn new(store: Arc<dyn KeyValueStore>, source: Arc<dyn QuerySource>) -> Self {
        Self {
            store,
            source,
            ttls: CacheTtls::default(),
            store_timeout: None,
            stats: StatsRecorder::default(),
        }
    }

    pub fn with_ttls(mut self, ttls: CacheTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Bounds every store call. A call that runs over counts as a store
    /// failure.
    pub fn with_store_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn ttls(&self) -> CacheTtls {
        self.ttls
    }

    // == Get Page ==
    /// Returns one listing page, from the store if possible.
    pub async fn get_page(&self, params: &ProductQueryParams) -> Result<Page<Product>> {
        let key = derive_key(params);

        if let Some(cached) = self.read::<CachedPage>(&key).await {
            return Ok(cached.into());
        }

        self.stats.record_source_query();
        let page = self.source.query(params).await?;

        let cached = CachedPage::from(page);
        self.write(&key, &cached, self.ttls.listing).await;
        Ok(cached.into())
    }

    // == Get Product ==
    /// Returns a single product. Unknown ids are not cached.
    pub async fn get_product(&self, id: i64) -> Result<Option<Product>> {
        let key = product_key(id);

        if let Some(cached) = self.read::<CachedProduct>(&key).await {
            return Ok(Some(cached.product));
        }

        self.stats.record_source_query();
        let Some(product) = self.source.find_by_id(id).await? else {
            return Ok(None);
        };

        let cached = CachedProduct { product };
        self.write(&key, &cached, self.ttls.single).await;
        Ok(Some(cached.product))
    }

    // == Get Filters ==
    /// Returns the brand/type facets.
    pub async fn get_filters(&self) -> Result<Filters> {
        if let Some(cached) = self.read::<CachedFilters>(FILTERS_KEY).await {
            return Ok(cached.into());
        }

        self.stats.record_source_query();
        let filters = self.source.distinct_brands_and_types().await?;

        let cached = CachedFilters::from(filters);
        self.write(FILTERS_KEY, &cached, self.ttls.filters).await;
        Ok(cached.into())
    }

    // == Invalidate ==
    /// Evicts every key a catalog change can affect. Best effort.
    pub async fn invalidate(&self, scope: InvalidationScope) -> InvalidationReport {
        self.stats.record_invalidation();
        let mut report = InvalidationReport::default();

        // Any change can move counts and page boundaries for every listing.
        self.sweep(LISTING_PATTERN, &mut report).await;
        self.remove(FILTERS_KEY, &mut report).await;

        match scope {
            InvalidationScope::Created => {}
            InvalidationScope::Updated(id) | InvalidationScope::Deleted(id) => {
                self.remove(&product_key(id), &mut report).await;
            }
            InvalidationScope::All => {
                self.sweep(SINGLE_PATTERN, &mut report).await;
            }
        }

        if report.failures > 0 {
            warn!(
                ?scope,
                failures = report.failures,
                "Cache invalidation incomplete, entries may stay stale until their TTL elapses"
            );
        } else {
            info!(?scope, keys_removed = report.keys_removed, "Cache invalidated");
        }

        report
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot()
    }

    // == Store Helpers ==
    async fn guarded<T, F>(&self, op: &str, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        match self.store_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(StoreError::Timeout(op.to_string()))),
            None => call.await,
        }
    }

    async fn read<E: Envelope>(&self, key: &str) -> Option<E> {
        match self.guarded("get", self.store.get(key)).await {
            Ok(Some(bytes)) => match E::decode(&bytes) {
                Ok(value) => {
                    self.stats.record_hit();
                    debug!(key, "Cache hit");
                    Some(value)
                }
                Err(error) => {
                    self.stats.record_miss();
                    warn!(key, %error, "Undecodable cache entry, treating as miss");
                    None
                }
            },
            Ok(None) => {
                self.stats.record_miss();
                debug!(key, "Cache miss");
                None
            }
            Err(error) => {
                self.stats.record_miss();
                self.stats.record_store_error();
                warn!(key, %error, "Cache read failed, falling back to source");
                None
            }
        }
    }

    async fn write<E: Envelope>(&self, key: &str, value: &E, ttl: Duration) {
        let bytes = match value.encode() {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(key, %error, "Could not encode cache entry");
                return;
            }
        };

        if let Err(error) = self.guarded("set", self.store.set(key, bytes, ttl)).await {
            self.stats.record_store_error();
            warn!(key, %error, "Cache write failed");
        }
    }

    async fn remove(&self, key: &str, report: &mut InvalidationReport) {
        match self.guarded("delete", self.store.delete(key)).await {
            Ok(removed) => report.keys_removed += u64::from(removed),
            Err(error) => {
                self.stats.record_store_error();
                report.failures += 1;
                warn!(key, %error, "Cache delete failed");
            }
        }
    }

    async fn sweep(&self, pattern: &str, report: &mut InvalidationReport) {
        match self
            .guarded("delete_by_pattern", self.store.delete_by_pattern(pattern))
            .await
        {
            Ok(count) => report.keys_removed += count,
            Err(error) => {
                self.stats.record_store_error();
                report.failures += 1;
                warn!(pattern, %error, "Cache pattern delete failed");
            }
        }
    }
}
