//! CLI command definitions and dispatch.

pub mod expiry;
pub mod history;
pub mod migrate;
pub mod policies;
pub mod reload;
pub mod validate;
pub mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::output::OutputFormat;
use pwguard_core::config::{AppConfig, EncoderSource};
use pwguard_core::error::AppError;
use pwguard_database::DatabasePool;
use pwguard_database::repositories::{
    AccountSettingsRepository, PasswordHistoryRepository, PolicyRepository,
};
use pwguard_policy::store::StaticTenantSettings;
use pwguard_policy::{HttpBreachClient, TenantSettingsProvider, ValidationEngine};

/// PwGuard: password policy validation engine
#[derive(Debug, Parser)]
#[command(name = "pwguard", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate a candidate password against the policy chain
    Validate(validate::ValidateArgs),
    /// Check whether a user's password has expired
    Expiry(expiry::ExpiryArgs),
    /// Policy definition management
    Policies(policies::PoliciesArgs),
    /// Password history management
    History(history::HistoryArgs),
    /// Load the policy chain once and report what was built
    Reload,
    /// Load the chain and keep it fresh until interrupted
    Watch,
    /// Database migration management
    Migrate(migrate::MigrateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Validate(args) => validate::execute(args, &config, self.format).await,
            Commands::Expiry(args) => expiry::execute(args, &config, self.format).await,
            Commands::Policies(args) => policies::execute(args, &config, self.format).await,
            Commands::History(args) => history::execute(args, &config).await,
            Commands::Reload => reload::execute(&config).await,
            Commands::Watch => watch::execute(&config).await,
            Commands::Migrate(args) => migrate::execute(args, &config).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
        .map_err(|e| AppError::configuration(format!("Failed to load config: {}", e)))
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = DatabasePool::connect(&config.database).await?;
    Ok(pool.pool().clone())
}

/// Helper: assemble an engine over the PostgreSQL stores
pub fn build_engine(config: &AppConfig, pool: &PgPool) -> Result<Arc<ValidationEngine>, AppError> {
    let breach = HttpBreachClient::new(&config.breach)?;

    let tenant: Arc<dyn TenantSettingsProvider> = match config.tenant.source {
        EncoderSource::Config => Arc::new(StaticTenantSettings::from_config(&config.tenant)),
        EncoderSource::Database => Arc::new(AccountSettingsRepository::new(pool.clone())),
    };

    let engine = ValidationEngine::builder(
        Arc::new(PolicyRepository::new(pool.clone())),
        Arc::new(breach),
    )
    .history_store(Arc::new(PasswordHistoryRepository::new(pool.clone())))
    .tenant_settings(tenant)
    .build();

    Ok(Arc::new(engine))
}

/// Helper: connect, build the engine, and load the chain
pub async fn load_engine(config: &AppConfig) -> Result<Arc<ValidationEngine>, AppError> {
    let pool = create_db_pool(config).await?;
    let engine = build_engine(config, &pool)?;
    engine.reload().await?;
    Ok(engine)
}
