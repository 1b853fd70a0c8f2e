//! Check password expiry for a user.

use clap::Args;

use crate::output::{self, OutputFormat};
use pwguard_core::config::AppConfig;
use pwguard_core::error::AppError;

/// Arguments for the expiry command
#[derive(Debug, Args)]
pub struct ExpiryArgs {
    /// Account name
    #[arg(short, long)]
    pub username: String,
}

/// Execute the expiry command
pub async fn execute(
    args: &ExpiryArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let engine = super::load_engine(config).await?;
    let result = engine.check_password_expiry(&args.username).await;

    output::print_result(&result, "Password has not expired", format);

    if !result.is_valid() {
        return Err(AppError::validation(format!(
            "Password for '{}' has expired",
            args.username
        )));
    }
    Ok(())
}
