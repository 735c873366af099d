//! Persistence seam consumed by the analytics layer and the API

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{BalanceSummary, NewTransaction, Transaction, TransactionKind, UserId};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Amount does not fit the store's fixed-point range")]
    AmountOutOfRange,
}

/// Persistence operations for user transactions.
///
/// `aggregate` must observe a single consistent snapshot: a concurrent
/// insert is either fully reflected in the balance and the count, or in
/// neither.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist a transaction, assigning its id and creation timestamp.
    async fn insert(&self, user_id: UserId, new: NewTransaction) -> Result<Transaction, StoreError>;

    /// Return one page of the user's transactions, newest first, together
    /// with the total count. `limit` of `None` returns everything.
    async fn list(
        &self,
        user_id: UserId,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<(Vec<Transaction>, i64), StoreError>;

    /// Sum the amounts of the user's transactions of one kind; zero when
    /// there are none.
    async fn sum_amount(
        &self,
        user_id: UserId,
        kind: TransactionKind,
    ) -> Result<Decimal, StoreError>;

    /// Total number of transactions owned by the user.
    async fn count(&self, user_id: UserId) -> Result<i64, StoreError>;

    /// Balance (income minus expenses) and transaction count in one
    /// consistent read.
    async fn aggregate(&self, user_id: UserId) -> Result<BalanceSummary, StoreError>;
}
