//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::CacheTtls;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds for paginated listings
    pub listing_ttl: u64,
    /// TTL in seconds for single-product lookups
    pub product_ttl: u64,
    /// TTL in seconds for the brand/type facets
    pub filters_ttl: u64,
    /// Deadline in milliseconds for each store call, 0 disables it
    pub store_timeout_ms: u64,
    /// Deadline in milliseconds for a whole HTTP request
    pub request_timeout_ms: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Start the in-memory catalog with demo products
    pub seed_catalog: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `LISTING_TTL_SECS` - Listing TTL (default: 600)
    /// - `PRODUCT_TTL_SECS` - Single product TTL (default: 1800)
    /// - `FILTERS_TTL_SECS` - Facets TTL (default: 3600)
    /// - `STORE_TIMEOUT_MS` - Per store call deadline, 0 disables (default: 250)
    /// - `REQUEST_TIMEOUT_MS` - Per request deadline, 0 disables (default: 5000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 30)
    /// - `SEED_CATALOG` - Load demo products at startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            listing_ttl: env_or("LISTING_TTL_SECS", defaults.listing_ttl),
            product_ttl: env_or("PRODUCT_TTL_SECS", defaults.product_ttl),
            filters_ttl: env_or("FILTERS_TTL_SECS", defaults.filters_ttl),
            store_timeout_ms: env_or("STORE_TIMEOUT_MS", defaults.store_timeout_ms),
            request_timeout_ms: env_or("REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            seed_catalog: env_or("SEED_CATALOG", defaults.seed_catalog),
        }
    }

    /// TTL classes for the query cache.
    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            listing: Duration::from_secs(self.listing_ttl),
            single: Duration::from_secs(self.product_ttl),
            filters: Duration::from_secs(self.filters_ttl),
        }
    }

    /// Store call deadline, `None` when disabled.
    pub fn store_timeout(&self) -> Option<Duration> {
        (self.store_timeout_ms > 0).then(|| Duration::from_millis(self.store_timeout_ms))
    }

    /// Request deadline, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_ms > 0).then(|| Duration::from_millis(self.request_timeout_ms))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            listing_ttl: 600,
            product_ttl: 1800,
            filters_ttl: 3600,
            store_timeout_ms: 250,
            request_timeout_ms: 5000,
            cleanup_interval: 30,
            seed_catalog: true,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
