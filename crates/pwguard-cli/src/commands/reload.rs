//! One-shot policy chain reload.

use crate::output;
use pwguard_core::config::AppConfig;
use pwguard_core::error::AppError;

/// Execute the reload command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;
    let engine = super::build_engine(config, &pool)?;

    let chain = engine.reload().await?;
    let keys: Vec<String> = chain.keys().iter().map(ToString::to_string).collect();

    output::print_success("Policy chain built");
    output::print_kv("Checks", &chain.len().to_string());
    output::print_kv("Order", &keys.join(", "));
    output::print_kv(
        "Source updated at",
        &chain
            .source_updated_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string()),
    );
    output::print_kv(
        "Loaded at",
        &chain
            .loaded_at()
            .map(|t| t.to_rfc3339())
            .unwrap_or_default(),
    );
    Ok(())
}
