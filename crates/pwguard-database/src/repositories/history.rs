//! Password history repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use pwguard_core::error::{AppError, ErrorKind};
use pwguard_core::result::AppResult;
use pwguard_entity::history::PasswordHistoryEntry;

/// Repository for the `password_history` table.
#[derive(Debug, Clone)]
pub struct PasswordHistoryRepository {
    pool: PgPool,
}

impl PasswordHistoryRepository {
    /// Create a new password history repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// When the user last changed their password (case-insensitive username).
    pub async fn last_change(&self, username: &str) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(changed_at) FROM password_history WHERE LOWER(username) = LOWER($1)",
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read last password change", e)
        })
    }

    /// The `limit` most recent history rows for a user, newest first.
    pub async fn find_recent(
        &self,
        username: &str,
        limit: u32,
    ) -> AppResult<Vec<PasswordHistoryEntry>> {
        sqlx::query_as::<_, PasswordHistoryEntry>(
            r#"SELECT * FROM password_history
               WHERE LOWER(username) = LOWER($1)
               ORDER BY changed_at DESC
               LIMIT $2"#,
        )
        .bind(username)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read password history", e)
        })
    }

    /// Record a newly set password.
    pub async fn record(
        &self,
        username: &str,
        salt: &str,
        hash: &str,
    ) -> AppResult<PasswordHistoryEntry> {
        sqlx::query_as::<_, PasswordHistoryEntry>(
            r#"INSERT INTO password_history (id, username, salt, hash, changed_at)
               VALUES ($1, $2, $3, $4, NOW())
               RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(salt)
        .bind(hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record password history", e)
        })
    }
}
