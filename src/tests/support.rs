//! Shared fakes and helpers for the test suite

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::cache::{CacheError, CacheStore};
use crate::config::Config;
use crate::db::migration;
use crate::db::store::{StoreError, TransactionStore};
use crate::models::{BalanceSummary, Category, NewTransaction, Transaction, TransactionKind, UserId};

/// Hand-cranked clock driving [`InMemoryCacheStore`] expiry.
#[derive(Clone, Default)]
pub struct MockClock {
    now: Arc<Mutex<Duration>>,
}

impl MockClock {
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }
}

/// Key-value cache fake with real expiry semantics but simulated time.
pub struct InMemoryCacheStore {
    clock: MockClock,
    entries: Mutex<HashMap<String, (String, Duration)>>,
}

impl InMemoryCacheStore {
    pub fn new(clock: MockClock) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();

        if let Some((value, expires_at)) = entries.get(key) {
            if self.clock.now() < *expires_at {
                return Ok(Some(value.clone()));
            }
        }

        entries.remove(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let expires_at = self.clock.now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Cache store that is always down; exercises the degraded path.
pub struct FailingCacheStore;

#[async_trait]
impl CacheStore for FailingCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("cache offline".to_string()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache offline".to_string()))
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("cache offline".to_string()))
    }
}

/// In-memory [`TransactionStore`] that counts aggregation calls, so tests
/// can tell whether a read hit the cache or recomputed.
pub struct InMemoryTransactionStore {
    rows: Mutex<Vec<Transaction>>,
    next_id: AtomicI64,
    aggregate_calls: AtomicUsize,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            aggregate_calls: AtomicUsize::new(0),
        }
    }

    pub fn aggregate_calls(&self) -> usize {
        self.aggregate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(
        &self,
        user_id: UserId,
        new: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let mut amount = new.amount;
        amount.rescale(2);

        let transaction = Transaction {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            amount,
            kind: new.kind,
            category: new.category,
            description: new.description,
            created_at: Utc::now(),
        };

        self.rows.lock().unwrap().push(transaction.clone());
        Ok(transaction)
    }

    async fn list(
        &self,
        user_id: UserId,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<(Vec<Transaction>, i64), StoreError> {
        let rows = self.rows.lock().unwrap();

        let mut matching: Vec<Transaction> = rows
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total_count = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit.map(|l| l as usize).unwrap_or(usize::MAX))
            .collect();

        Ok((page, total_count))
    }

    async fn sum_amount(
        &self,
        user_id: UserId,
        kind: TransactionKind,
    ) -> Result<Decimal, StoreError> {
        let rows = self.rows.lock().unwrap();

        let mut sum: Decimal = rows
            .iter()
            .filter(|t| t.user_id == user_id && t.kind == kind)
            .map(|t| t.amount)
            .sum();
        sum.rescale(2);

        Ok(sum)
    }

    async fn count(&self, user_id: UserId) -> Result<i64, StoreError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().filter(|t| t.user_id == user_id).count() as i64)
    }

    async fn aggregate(&self, user_id: UserId) -> Result<BalanceSummary, StoreError> {
        self.aggregate_calls.fetch_add(1, Ordering::SeqCst);

        let rows = self.rows.lock().unwrap();

        let mut balance = Decimal::ZERO;
        let mut transaction_count = 0;
        for transaction in rows.iter().filter(|t| t.user_id == user_id) {
            match transaction.kind {
                TransactionKind::Income => balance += transaction.amount,
                TransactionKind::Expense => balance -= transaction.amount,
            }
            transaction_count += 1;
        }
        balance.rescale(2);

        Ok(BalanceSummary {
            balance,
            transaction_count,
        })
    }
}

/// Fresh single-connection in-memory database with the schema applied.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    migration::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        cache_ttl: Duration::from_secs(300),
        cache_max_capacity: 1_000,
        jwt_secret: "test-secret".to_string(),
        access_token_ttl: Duration::from_secs(900),
        refresh_token_ttl: Duration::from_secs(86_400),
        // The default cost makes the end-to-end tests crawl.
        bcrypt_cost: 4,
    }
}

pub fn new_transaction(amount: &str, kind: TransactionKind) -> NewTransaction {
    NewTransaction {
        amount: amount.parse().expect("Bad decimal literal in test"),
        kind,
        category: Category::default(),
        description: None,
    }
}

pub fn income(amount: &str) -> NewTransaction {
    new_transaction(amount, TransactionKind::Income)
}

pub fn expense(amount: &str) -> NewTransaction {
    new_transaction(amount, TransactionKind::Expense)
}
