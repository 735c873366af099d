use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier of a registered user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user returned by the registration endpoint.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
        }
    }
}

/// Whether a transaction adds to or subtracts from the balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of spending categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
pub enum Category {
    Food,
    Salary,
    Rent,
    Utilities,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Salary => "Salary",
            Self::Rent => "Rent",
            Self::Utilities => "Utilities",
            Self::Other => "Other",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            l if l.eq_ignore_ascii_case("Food") => Some(Self::Food),
            l if l.eq_ignore_ascii_case("Salary") => Some(Self::Salary),
            l if l.eq_ignore_ascii_case("Rent") => Some(Self::Rent),
            l if l.eq_ignore_ascii_case("Utilities") => Some(Self::Utilities),
            l if l.eq_ignore_ascii_case("Other") => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted transaction. Amounts carry exactly two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(skip_serializing)]
    pub user_id: UserId,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Category,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A validated transaction that has not been persisted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category: Category,
    pub description: Option<String>,
}

/// Aggregated balance for one user: the sum of income minus the sum of
/// expenses, together with the total number of transactions.
///
/// This doubles as the cache payload. Serde encodes the decimal as a
/// string, so values survive cache round-trips without any precision loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub balance: Decimal,
    pub transaction_count: i64,
}

/// Body of the analytics endpoint.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub balance: Decimal,
    pub transaction_count: i64,
    /// Creation time of the most recent transaction, if the marker is
    /// still cached. Display only; independent of the balance entry.
    pub last_activity: Option<DateTime<Utc>>,
}
