pub mod connection;
pub mod migration;
pub mod store;
pub mod transaction;
pub mod user;

use chrono::{DateTime, Utc};

/// Convert a unix-seconds column to a UTC datetime. Rows written by this
/// crate are always in range; anything else collapses to the epoch.
pub(crate) fn datetime_from_unix(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}
