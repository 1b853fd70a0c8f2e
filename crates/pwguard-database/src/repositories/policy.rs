//! Policy definition repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use pwguard_core::error::{AppError, ErrorKind};
use pwguard_core::result::AppResult;
use pwguard_entity::policy::PolicyDefinition;

/// Repository for the `password_policies` table.
#[derive(Debug, Clone)]
pub struct PolicyRepository {
    pool: PgPool,
}

impl PolicyRepository {
    /// Create a new policy repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List every required policy, lowest priority first.
    pub async fn find_required_ordered(&self) -> AppResult<Vec<PolicyDefinition>> {
        sqlx::query_as::<_, PolicyDefinition>(
            "SELECT * FROM password_policies WHERE required = TRUE ORDER BY priority ASC, key ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list required policies", e)
        })
    }

    /// List all policies, including optional ones.
    pub async fn find_all(&self) -> AppResult<Vec<PolicyDefinition>> {
        sqlx::query_as::<_, PolicyDefinition>(
            "SELECT * FROM password_policies ORDER BY priority ASC, key ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list policies", e))
    }

    /// Most recent `last_updated` across all rows, or `None` for an empty table.
    pub async fn max_last_updated(&self) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, Option<DateTime<Utc>>>(
            "SELECT MAX(last_updated) FROM password_policies",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read policy timestamp", e)
        })
    }

    /// Insert or replace the policy with the given key.
    pub async fn upsert(&self, definition: &PolicyDefinition) -> AppResult<PolicyDefinition> {
        sqlx::query_as::<_, PolicyDefinition>(
            r#"INSERT INTO password_policies (id, key, priority, required, validation_rules, last_updated)
               VALUES ($1, $2, $3, $4, $5, NOW())
               ON CONFLICT (key) DO UPDATE
               SET priority = EXCLUDED.priority,
                   required = EXCLUDED.required,
                   validation_rules = EXCLUDED.validation_rules,
                   last_updated = NOW()
               RETURNING *"#,
        )
        .bind(definition.id)
        .bind(&definition.key)
        .bind(definition.priority)
        .bind(definition.required)
        .bind(&definition.validation_rules)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert policy", e))
    }

    /// Delete the policy with the given key. Returns `true` if a row was removed.
    pub async fn delete_by_key(&self, key: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM password_policies WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete policy", e))?;
        Ok(result.rows_affected() > 0)
    }
}
