//! Password history management commands.

use clap::{Args, Subcommand};

use crate::output;
use pwguard_core::config::{AppConfig, EncoderSource};
use pwguard_core::error::AppError;
use pwguard_database::repositories::{AccountSettingsRepository, PasswordHistoryRepository};
use pwguard_policy::PasswordEncoder;

/// Arguments for history commands
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// History subcommand
    #[command(subcommand)]
    pub command: HistoryCommand,
}

/// History subcommands
#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Record a password the user has just set
    Record {
        /// Account name
        #[arg(short, long)]
        username: String,
        /// The new password
        #[arg(short, long)]
        password: String,
    },
}

/// Execute history commands
pub async fn execute(args: &HistoryArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        HistoryCommand::Record { username, password } => {
            let encoder_id = match config.tenant.source {
                EncoderSource::Config => Some(config.tenant.password_encoder.clone()),
                EncoderSource::Database => AccountSettingsRepository::new(pool.clone())
                    .find()
                    .await?
                    .and_then(|s| s.password_encoder),
            };
            let encoder: PasswordEncoder = encoder_id
                .ok_or_else(|| AppError::configuration("No password encoder configured"))?
                .parse()?;

            let credential = encoder.encode(password)?;
            let entry = PasswordHistoryRepository::new(pool)
                .record(username, &credential.salt, &credential.hash)
                .await?;

            output::print_success(&format!(
                "Recorded {} password for '{}' at {}",
                encoder,
                entry.username,
                entry.changed_at.to_rfc3339()
            ));
        }
    }

    Ok(())
}
