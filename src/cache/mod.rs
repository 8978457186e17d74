//! Cache Module
//!
//! The key-value store contract the catalog cache is written against, plus
//! an in-memory implementation with TTL expiration and glob deletes.

mod clock;
mod entry;
mod memory;
mod pattern;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::StoreResult;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use memory::MemoryStore;
pub use pattern::glob_match;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Key-Value Store ==
/// Byte-oriented store with per-key TTL and pattern deletes.
///
/// Implementations only need per-key atomicity; callers never rely on
/// multi-key transactions.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored bytes, or `None` if absent or expired.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()>;

    /// Removes `key`. Returns whether a live entry was removed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Removes every key matching the glob `pattern`. Returns the count.
    async fn delete_by_pattern(&self, pattern: &str) -> StoreResult<u64>;
}
