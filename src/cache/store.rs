//! Cache backend abstraction
//!
//! The analytics layer talks to a plain key-value store with per-entry
//! expiry. Implementations must be shareable across request handlers;
//! tests substitute an in-memory store driven by a manual clock.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store with per-entry time-to-live.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a value. `Ok(None)` means absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store a value that expires `ttl` after this write.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a value. Deleting an absent key is a no-op, not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
