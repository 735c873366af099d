//! Read-through balance analytics
//!
//! Sits between the transaction store's aggregation query and repeated
//! client reads. Reads are served from a per-user cache entry while it
//! lives; every transaction write drops that entry before the writer gets
//! its response, so the next read recomputes from the store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheStore};
use crate::db::store::{StoreError, TransactionStore};
use crate::models::{BalanceSummary, Transaction, UserId};

/// Orchestrates the per-user balance cache over the transaction store.
///
/// Both collaborators are injected, so tests can substitute in-memory
/// fakes with a controllable clock.
#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn TransactionStore>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn TransactionStore>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Return the user's balance and transaction count, from the cache when
    /// a live entry exists, otherwise from a fresh aggregation whose result
    /// is cached for the configured TTL.
    ///
    /// Cache trouble never fails the read: an unreachable or unreadable
    /// backend downgrades this to aggregate-on-every-call. Store errors
    /// propagate.
    pub async fn get_or_compute(&self, user_id: UserId) -> Result<BalanceSummary, StoreError> {
        let key = CacheKey::analytics(user_id).to_string();

        match self.cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<BalanceSummary>(&raw) {
                Ok(summary) => {
                    debug!("Serving analytics for user {} from cache", user_id);
                    return Ok(summary);
                }
                Err(e) => {
                    warn!("Discarding unreadable cache entry {}: {}", key, e);
                }
            },
            Ok(None) => {}
            Err(e) => {
                warn!("Cache read failed for {}, recomputing: {}", key, e);
            }
        }

        let summary = self.store.aggregate(user_id).await?;

        match serde_json::to_string(&summary) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&key, raw, self.ttl).await {
                    warn!("Failed to cache analytics for user {}: {}", user_id, e);
                }
            }
            Err(e) => {
                warn!("Failed to serialize analytics for user {}: {}", user_id, e);
            }
        }

        Ok(summary)
    }

    /// Drop the user's cached balance entry.
    ///
    /// Idempotent: invalidating an absent entry is a no-op. Backend
    /// failures are logged and swallowed, trading at worst one TTL of
    /// staleness for availability.
    pub async fn invalidate(&self, user_id: UserId) {
        let key = CacheKey::analytics(user_id).to_string();

        match self.cache.delete(&key).await {
            Ok(()) => debug!("Invalidated analytics cache for user {}", user_id),
            Err(e) => warn!("Cache invalidation failed for {}: {}", key, e),
        }
    }

    /// Write trigger, to be awaited between persisting a transaction and
    /// sending the response: invalidate the user's balance entry so the
    /// next read recomputes, then refresh the last-activity marker.
    pub async fn on_transaction_created(&self, user_id: UserId, transaction: &Transaction) {
        self.invalidate(user_id).await;

        let marker_key = CacheKey::last_activity(user_id).to_string();
        match serde_json::to_string(&transaction.created_at) {
            Ok(raw) => {
                if let Err(e) = self.cache.set(&marker_key, raw, self.ttl).await {
                    warn!("Failed to record last activity for user {}: {}", user_id, e);
                }
            }
            Err(e) => {
                warn!("Failed to serialize last activity for user {}: {}", user_id, e);
            }
        }
    }

    /// When the user last recorded a transaction, if the marker is still
    /// cached. Display only: says nothing about whether the balance entry
    /// is fresh.
    pub async fn last_activity(&self, user_id: UserId) -> Option<DateTime<Utc>> {
        let key = CacheKey::last_activity(user_id).to_string();

        match self.cache.get(&key).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }
}
