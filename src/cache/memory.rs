//! Memory Store Module
//!
//! In-process key-value store combining HashMap storage with TTL expiration
//! and glob pattern deletes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{
    glob_match, CacheEntry, Clock, KeyValueStore, SystemClock, MAX_KEY_LENGTH, MAX_VALUE_SIZE,
};
use crate::error::{StoreError, StoreResult};

// == Memory Store ==
/// In-memory store with per-entry TTL.
///
/// Expired entries read as absent and are dropped lazily on access or by
/// [`MemoryStore::cleanup_expired`].
#[derive(Debug)]
pub struct MemoryStore {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry>>,
    /// Time source for TTL evaluation
    clock: Arc<dyn Clock>,
    /// Outage switch; when false every operation fails
    available: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            available: AtomicBool::new(true),
        }
    }

    // == Availability ==
    /// Simulates an outage (`false`) or recovery (`true`).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> StoreResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(StoreError::Unavailable)
        }
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the store.
    ///
    /// Returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    // == Keys ==
    /// Returns the live keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let now = self.clock.now_ms();
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    // == Get ==
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        self.ensure_available()?;
        let now = self.clock.now_ms();

        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired_at(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }

        // Expired: drop it, unless a writer replaced it in the meantime
        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now))
        {
            entries.remove(key);
        }
        Ok(None)
    }

    // == Set ==
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> StoreResult<()> {
        self.ensure_available()?;

        if key.is_empty() {
            return Err(StoreError::InvalidKey("key cannot be empty".to_string()));
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(StoreError::InvalidKey(format!(
                "key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(StoreError::ValueTooLarge(value.len()));
        }

        let entry = CacheEntry::new(value, ttl, self.clock.now_ms());
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    // == Delete ==
    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.ensure_available()?;
        let now = self.clock.now_ms();

        let removed = self.entries.write().await.remove(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired_at(now)))
    }

    // == Delete By Pattern ==
    async fn delete_by_pattern(&self, pattern: &str) -> StoreResult<u64> {
        self.ensure_available()?;
        let now = self.clock.now_ms();

        // Expired matches are dropped too but only live ones are counted
        let mut removed = 0u64;
        self.entries.write().await.retain(|key, entry| {
            if !glob_match(pattern, key) {
                return true;
            }
            if !entry.is_expired_at(now) {
                removed += 1;
            }
            false
        });
        Ok(removed)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;

    fn store_with_clock() -> (MemoryStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        (MemoryStore::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store
            .set("key1", b"value1".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();
        let value = store.get("key1").await.unwrap();

        assert_eq!(value, Some(b"value1".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_delete() {
        let store = MemoryStore::new();

        store
            .set("key1", b"value1".to_vec(), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(store.delete("key1").await.unwrap());
        assert!(!store.delete("key1").await.unwrap());
        assert!(store.is_empty().await);
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_overwrite_resets_ttl() {
        let (store, clock) = store_with_clock();

        store.set("key1", b"v1".to_vec(), Duration::from_secs(10)).await.unwrap();
        clock.advance(Duration::from_secs(8));
        store.set("key1", b"v2".to_vec(), Duration::from_secs(10)).await.unwrap();
        clock.advance(Duration::from_secs(8));

        assert_eq!(store.get("key1").await.unwrap(), Some(b"v2".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_ttl_expiration() {
        let (store, clock) = store_with_clock();

        store.set("key1", b"value1".to_vec(), Duration::from_secs(1)).await.unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        clock.advance(Duration::from_secs(1));

        assert_eq!(store.get("key1").await.unwrap(), None);
        // Lazily removed on read
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_store_read_does_not_extend_ttl() {
        let (store, clock) = store_with_clock();

        store.set("key1", b"value1".to_vec(), Duration::from_secs(10)).await.unwrap();
        for _ in 0..9 {
            clock.advance(Duration::from_secs(1));
            assert!(store.get("key1").await.unwrap().is_some());
        }

        clock.advance(Duration::from_secs(1));
        assert_eq!(store.get("key1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_delete_by_pattern() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);

        store.set("products:search:all:order:name:page:1:size:8", vec![1], ttl).await.unwrap();
        store.set("products:search:all:order:price:page:1:size:8", vec![2], ttl).await.unwrap();
        store.set("products:filters", vec![3], ttl).await.unwrap();
        store.set("product:single:1", vec![4], ttl).await.unwrap();

        let removed = store.delete_by_pattern("products:*").await.unwrap();

        assert_eq!(removed, 3);
        assert_eq!(store.keys().await, vec!["product:single:1".to_string()]);
    }

    #[tokio::test]
    async fn test_store_delete_by_pattern_counts_live_entries_only() {
        let (store, clock) = store_with_clock();

        store.set("products:a", vec![1], Duration::from_secs(1)).await.unwrap();
        store.set("products:b", vec![2], Duration::from_secs(60)).await.unwrap();
        clock.advance(Duration::from_secs(2));

        assert!(!store.delete("products:a").await.unwrap());
        store.set("products:a", vec![1], Duration::from_secs(1)).await.unwrap();
        clock.advance(Duration::from_secs(2));

        // Same count a single-key delete would report
        assert_eq!(store.delete_by_pattern("products:*").await.unwrap(), 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_cleanup_expired() {
        let (store, clock) = store_with_clock();

        store.set("key1", b"value1".to_vec(), Duration::from_secs(1)).await.unwrap();
        store.set("key2", b"value2".to_vec(), Duration::from_secs(10)).await.unwrap();

        clock.advance(Duration::from_secs(2));

        let removed = store.cleanup_expired().await;
        assert_eq!(removed, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("key2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_store_key_validation() {
        let store = MemoryStore::new();
        let ttl = Duration::from_secs(60);

        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);
        assert!(matches!(
            store.set(&long_key, vec![], ttl).await,
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("", vec![], ttl).await,
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[tokio::test]
    async fn test_store_value_too_large() {
        let store = MemoryStore::new();
        let large_value = vec![0u8; MAX_VALUE_SIZE + 1];

        let result = store.set("key", large_value, Duration::from_secs(60)).await;
        assert_eq!(result, Err(StoreError::ValueTooLarge(MAX_VALUE_SIZE + 1)));
    }

    #[tokio::test]
    async fn test_store_outage() {
        let store = MemoryStore::new();
        store.set("key", vec![1], Duration::from_secs(60)).await.unwrap();

        store.set_available(false);
        assert_eq!(store.get("key").await, Err(StoreError::Unavailable));
        assert_eq!(
            store.set("key", vec![2], Duration::from_secs(60)).await,
            Err(StoreError::Unavailable)
        );
        assert_eq!(store.delete_by_pattern("*").await, Err(StoreError::Unavailable));

        store.set_available(true);
        assert_eq!(store.get("key").await.unwrap(), Some(vec![1]));
    }
}
