use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::datetime_from_unix;
use crate::db::store::{StoreError, TransactionStore};
use crate::models::{
    BalanceSummary, Category, NewTransaction, Transaction, TransactionKind, UserId,
};

/// SQLite-backed [`TransactionStore`].
///
/// Amounts are stored as integer minor units (cents), so sums computed in
/// SQL stay exact.
#[derive(Clone)]
pub struct SqliteTransactionStore {
    pool: SqlitePool,
}

impl SqliteTransactionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn to_minor_units(amount: Decimal) -> Result<i64, StoreError> {
    let mut scaled = amount;
    scaled.rescale(2);
    i64::try_from(scaled.mantissa()).map_err(|_| StoreError::AmountOutOfRange)
}

fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, 2)
}

fn row_to_transaction(row: &SqliteRow) -> Result<Transaction, sqlx::Error> {
    let kind_label: String = row.get("kind");
    let kind = TransactionKind::parse(&kind_label).ok_or_else(|| {
        sqlx::Error::Decode(format!("unrecognized transaction kind {:?}", kind_label).into())
    })?;

    // Unknown labels written by older schema versions degrade to Other.
    let category_label: String = row.get("category");
    let category = Category::parse(&category_label).unwrap_or_default();

    Ok(Transaction {
        id: row.get("id"),
        user_id: UserId::new(row.get("user_id")),
        amount: from_minor_units(row.get("amount_minor")),
        kind,
        category,
        description: row.get("description"),
        created_at: datetime_from_unix(row.get("created_at")),
    })
}

#[async_trait]
impl TransactionStore for SqliteTransactionStore {
    async fn insert(
        &self,
        user_id: UserId,
        new: NewTransaction,
    ) -> Result<Transaction, StoreError> {
        let amount_minor = to_minor_units(new.amount)?;
        let created_ts = Utc::now().timestamp();

        let result = sqlx::query(
            "INSERT INTO transactions (user_id, amount_minor, kind, category, description, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user_id.as_i64())
        .bind(amount_minor)
        .bind(new.kind.as_str())
        .bind(new.category.as_str())
        .bind(new.description.clone())
        .bind(created_ts)
        .execute(&self.pool)
        .await?;

        Ok(Transaction {
            id: result.last_insert_rowid(),
            user_id,
            amount: from_minor_units(amount_minor),
            kind: new.kind,
            category: new.category,
            description: new.description,
            created_at: datetime_from_unix(created_ts),
        })
    }

    async fn list(
        &self,
        user_id: UserId,
        offset: i64,
        limit: Option<i64>,
    ) -> Result<(Vec<Transaction>, i64), StoreError> {
        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = ?")
                .bind(user_id.as_i64())
                .fetch_one(&self.pool)
                .await?;

        // SQLite treats a negative LIMIT as "no limit".
        let rows = sqlx::query(
            "SELECT id, user_id, amount_minor, kind, category, description, created_at
             FROM transactions
             WHERE user_id = ?
             ORDER BY created_at DESC, id DESC
             LIMIT ? OFFSET ?",
        )
        .bind(user_id.as_i64())
        .bind(limit.unwrap_or(-1))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let transactions = rows
            .iter()
            .map(row_to_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((transactions, total_count))
    }

    async fn sum_amount(
        &self,
        user_id: UserId,
        kind: TransactionKind,
    ) -> Result<Decimal, StoreError> {
        let minor: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_minor), 0) FROM transactions
             WHERE user_id = ? AND kind = ?",
        )
        .bind(user_id.as_i64())
        .bind(kind.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(from_minor_units(minor))
    }

    async fn count(&self, user_id: UserId) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE user_id = ?")
            .bind(user_id.as_i64())
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn aggregate(&self, user_id: UserId) -> Result<BalanceSummary, StoreError> {
        // One statement, one snapshot: the sums and the count can never
        // disagree about which transactions exist.
        let row = sqlx::query(
            "SELECT
                COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_minor END), 0) AS income_minor,
                COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_minor END), 0) AS expense_minor,
                COUNT(id) AS transaction_count
             FROM transactions
             WHERE user_id = ?",
        )
        .bind(user_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        let income_minor: i64 = row.get("income_minor");
        let expense_minor: i64 = row.get("expense_minor");

        Ok(BalanceSummary {
            balance: from_minor_units(income_minor - expense_minor),
            transaction_count: row.get("transaction_count"),
        })
    }
}
