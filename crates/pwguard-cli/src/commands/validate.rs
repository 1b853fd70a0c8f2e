//! Validate a candidate password.

use chrono::{DateTime, Utc};
use clap::Args;

use crate::output::{self, OutputFormat};
use pwguard_core::config::AppConfig;
use pwguard_core::error::AppError;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Account name
    #[arg(short, long)]
    pub username: String,

    /// Candidate password
    #[arg(short, long)]
    pub password: String,

    /// Treat the account as existing (runs expiration and cooldown checks)
    #[arg(long)]
    pub existing: bool,

    /// Time of the last password change (RFC 3339); implies --existing
    #[arg(long)]
    pub last_change: Option<DateTime<Utc>>,
}

/// Execute the validate command
pub async fn execute(
    args: &ValidateArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let engine = super::load_engine(config).await?;

    let result = if args.existing || args.last_change.is_some() {
        engine
            .validate_existing_user_password(&args.password, &args.username, args.last_change)
            .await
    } else {
        engine
            .validate_new_user_password(&args.password, &args.username)
            .await
    };

    output::print_result(&result, "Password accepted", format);

    if !result.is_valid() {
        return Err(AppError::validation("Password does not satisfy the policy chain"));
    }
    Ok(())
}
