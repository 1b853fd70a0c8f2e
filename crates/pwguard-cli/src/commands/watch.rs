//! Keep a policy chain loaded and refreshed until interrupted.

use tokio::sync::watch;
use tracing::info;

use crate::output;
use pwguard_core::config::AppConfig;
use pwguard_core::error::AppError;
use pwguard_policy::StalenessPoller;

/// Execute the watch command
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let engine = super::load_engine(config).await?;
    let chain = engine.current_chain().await;
    output::print_success(&format!("Loaded {} policy check(s)", chain.len()));

    if !config.engine.poll_enabled {
        output::print_warning("Staleness polling is disabled in [engine]; nothing to watch.");
        return Ok(());
    }

    let poller = StalenessPoller::from_config(engine, &config.engine);
    println!(
        "Watching for policy changes every {}s (Ctrl+C to stop)...",
        poller.interval().as_secs()
    );

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { poller.run(cancel_rx).await });

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| AppError::internal(format!("Failed to listen for Ctrl+C: {}", e)))?;

    info!("Shutdown signal received");
    let _ = cancel_tx.send(true);
    handle
        .await
        .map_err(|e| AppError::internal(format!("Poller task failed: {}", e)))?;

    output::print_success("Stopped watching.");
    Ok(())
}
