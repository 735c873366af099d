use std::sync::Arc;

use sqlx::SqlitePool;

use crate::cache::{self, CacheStore};
use crate::config::Config;
use crate::db::store::TransactionStore;
use crate::db::transaction::SqliteTransactionStore;
use crate::service::AnalyticsService;

/// Shared application state, cloned into every handler via `Arc`.
pub struct AppState {
    pub config: Config,
    pub db_pool: SqlitePool,
    pub store: Arc<dyn TransactionStore>,
    pub analytics: AnalyticsService,
}

impl AppState {
    /// Wire the production store and cache together.
    pub fn new(config: Config, db_pool: SqlitePool) -> Self {
        let store: Arc<dyn TransactionStore> =
            Arc::new(SqliteTransactionStore::new(db_pool.clone()));
        let cache: Arc<dyn CacheStore> = Arc::new(cache::init_cache(&config));
        let analytics = AnalyticsService::new(store.clone(), cache, config.cache_ttl);

        Self {
            config,
            db_pool,
            store,
            analytics,
        }
    }
}
