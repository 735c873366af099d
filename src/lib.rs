pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod models;
pub mod service;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod tests;

// Re-export specific items for convenience
pub use api::error::ApiError;
pub use api::route::create_router;
pub use cache::{CacheKey, CacheStore, MokaCacheStore};
pub use db::connection;
pub use db::store::TransactionStore;
pub use db::transaction::SqliteTransactionStore;
pub use models::{BalanceSummary, Transaction};
pub use service::AnalyticsService;
pub use state::AppState;
