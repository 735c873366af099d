use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::db::datetime_from_unix;
use crate::models::{User, UserId};

fn row_to_user(row: &SqliteRow) -> User {
    User {
        id: UserId::new(row.get("id")),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: datetime_from_unix(row.get("created_at")),
    }
}

/// Insert a new user. Uniqueness of username and email is enforced by the
/// schema; violations surface as [`sqlx::Error::Database`].
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let created_ts = Utc::now().timestamp();

    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(created_ts)
    .execute(pool)
    .await?;

    Ok(User {
        id: UserId::new(result.last_insert_rowid()),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        created_at: datetime_from_unix(created_ts),
    })
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_user))
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: UserId) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
    )
    .bind(user_id.as_i64())
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(row_to_user))
}
