//! Database migration runner.

use sqlx::PgPool;
use tracing::info;

use pwguard_core::error::{AppError, ErrorKind};

/// Apply the embedded schema migrations for the policy, history, and
/// account-settings tables.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migrations: {e}"),
                e,
            )
        })?;

    info!("Policy database migrations applied");
    Ok(())
}
