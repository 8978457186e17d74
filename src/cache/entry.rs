//! Cache Entry Module
//!
//! Defines the structure for individual stored values with TTL support.

use std::time::Duration;

// == Cache Entry ==
/// Represents a single stored value with its expiry metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored bytes
    pub value: Vec<u8>,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` after `now_ms`.
    pub fn new(value: Vec<u8>, ttl: Duration, now_ms: u64) -> Self {
        Self {
            value,
            expires_at: now_ms.saturating_add(u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time, so a fully elapsed TTL never serves a value.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms >= self.expires_at
    }
}
