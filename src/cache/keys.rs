//! Cache key generation and management

use std::fmt;

use crate::models::UserId;

/// A structured cache key that can be converted to a string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Key for a user's cached balance and transaction count
    Analytics(UserId),
    /// Key for the marker recording a user's most recent transaction
    LastActivity(UserId),
}

impl CacheKey {
    /// Create a new analytics key
    pub fn analytics(user_id: UserId) -> Self {
        Self::Analytics(user_id)
    }

    /// Create a new last-activity key
    pub fn last_activity(user_id: UserId) -> Self {
        Self::LastActivity(user_id)
    }

    /// Get the user the key belongs to
    pub fn user_id(&self) -> UserId {
        match self {
            Self::Analytics(user_id) | Self::LastActivity(user_id) => *user_id,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analytics(user_id) => write!(f, "user_analytics_{}", user_id.as_i64()),
            Self::LastActivity(user_id) => write!(f, "user_last_activity_{}", user_id.as_i64()),
        }
    }
}
