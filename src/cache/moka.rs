//! Moka-backed cache store

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use tracing::debug;

use crate::cache::store::{CacheError, CacheStore};

/// A cached value together with the lifetime requested when it was written.
#[derive(Clone)]
struct CachedEntry {
    payload: String,
    ttl: Duration,
}

/// Expiry policy that honours the per-entry lifetime instead of a global one.
/// Every write restarts the clock, including an overwrite of a live key.
struct EntryTtl;

impl Expiry<String, CachedEntry> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }

    // Without this override moka keeps the remaining lifetime on overwrite,
    // leaving the new value pinned to the old value's deadline.
    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// In-process [`CacheStore`] on top of a moka future cache.
#[derive(Clone)]
pub struct MokaCacheStore {
    cache: Cache<String, CachedEntry>,
}

impl MokaCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entry = self.cache.get(key).await;

        if entry.is_some() {
            debug!("Cache hit for key: {}", key);
        } else {
            debug!("Cache miss for key: {}", key);
        }

        Ok(entry.map(|e| e.payload))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = CachedEntry {
            payload: value,
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        debug!("Cached value for key: {} with TTL: {:?}", key, ttl);

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key).await;
        debug!("Invalidated cache key: {}", key);

        Ok(())
    }
}
