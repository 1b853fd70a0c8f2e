//! Account settings repository implementation.

use sqlx::PgPool;

use pwguard_core::error::{AppError, ErrorKind};
use pwguard_core::result::AppResult;
use pwguard_entity::account::AccountSettings;

/// Repository for the single-row `account_settings` table.
#[derive(Debug, Clone)]
pub struct AccountSettingsRepository {
    pool: PgPool,
}

impl AccountSettingsRepository {
    /// Create a new account settings repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the settings row, if one has been written.
    pub async fn find(&self) -> AppResult<Option<AccountSettings>> {
        sqlx::query_as::<_, AccountSettings>("SELECT * FROM account_settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load account settings", e)
            })
    }
}
