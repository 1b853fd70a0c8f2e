//! Periodic staleness poll.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use pwguard_core::config::EngineConfig;

use crate::engine::ValidationEngine;

const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Reloads the engine whenever the policy store reports newer definitions.
#[derive(Debug, Clone)]
pub struct StalenessPoller {
    engine: Arc<ValidationEngine>,
    interval: Duration,
}

impl StalenessPoller {
    /// Create a poller ticking every `interval` (at least one second).
    pub fn new(engine: Arc<ValidationEngine>, interval: Duration) -> Self {
        Self {
            engine,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Create a poller from the `[engine]` config section.
    pub fn from_config(engine: Arc<ValidationEngine>, config: &EngineConfig) -> Self {
        Self::new(engine, Duration::from_secs(config.poll_interval_seconds))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run one staleness check. Errors are logged and the current chain kept.
    pub async fn poll_once(&self) -> bool {
        match self.engine.refresh_if_stale().await {
            Ok(reloaded) => reloaded,
            Err(e) => {
                error!(error = %e, "Policy staleness poll failed; retrying next tick");
                false
            }
        }
    }

    /// Poll until the cancel signal flips to `true` or its sender is dropped.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Policy staleness poller started"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        info!("Policy staleness poller received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if self.poll_once().await {
                        debug!("Policy chain refreshed by poller");
                    }
                }
            }
        }

        info!("Policy staleness poller stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::{BreachLookup, BreachLookupError};
    use crate::store::{MemoryHistoryStore, MemoryPolicyStore, StaticTenantSettings};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use pwguard_entity::policy::PolicyDefinition;
    use serde_json::json;

    #[derive(Debug)]
    struct NoBreach;

    #[async_trait]
    impl BreachLookup for NoBreach {
        async fn range(&self, _prefix: &str) -> Result<String, BreachLookupError> {
            Ok(String::new())
        }
    }

    fn setup() -> (Arc<MemoryPolicyStore>, Arc<ValidationEngine>) {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = Arc::new(MemoryPolicyStore::with_definitions(vec![
            PolicyDefinition::new("size", 1, json!({})).updated_at(t0),
        ]));
        let engine = ValidationEngine::builder(store.clone(), Arc::new(NoBreach))
            .history_store(Arc::new(MemoryHistoryStore::new()))
            .tenant_settings(Arc::new(StaticTenantSettings::new("argon2")))
            .build();
        (store, Arc::new(engine))
    }

    #[test]
    fn test_interval_is_clamped() {
        let (_, engine) = setup();
        let poller = StalenessPoller::new(engine, Duration::ZERO);
        assert_eq!(poller.interval(), MIN_INTERVAL);
    }

    #[tokio::test]
    async fn test_poll_once_reloads_only_on_change() {
        let (store, engine) = setup();
        let poller = StalenessPoller::new(engine.clone(), Duration::from_secs(60));

        assert!(poller.poll_once().await);
        assert!(!poller.poll_once().await);

        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        store
            .upsert(PolicyDefinition::new("complexity", 2, json!({})).updated_at(t1))
            .await;
        assert!(poller.poll_once().await);
        assert_eq!(engine.current_chain().await.len(), 2);
    }

    #[tokio::test]
    async fn test_poll_once_swallows_store_errors() {
        let (store, engine) = setup();
        let poller = StalenessPoller::new(engine.clone(), Duration::from_secs(60));
        assert!(poller.poll_once().await);

        store.set_unavailable(true);
        assert!(!poller.poll_once().await);
        assert_eq!(engine.current_chain().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_picks_up_changes_and_stops_on_cancel() {
        let (store, engine) = setup();
        engine.reload().await.unwrap();

        let t1 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        store
            .upsert(PolicyDefinition::new("complexity", 2, json!({})).updated_at(t1))
            .await;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let poller = StalenessPoller::new(engine.clone(), Duration::from_secs(60));
        let handle = tokio::spawn(async move { poller.run(cancel_rx).await });

        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(engine.current_chain().await.len(), 1);

        time::sleep(Duration::from_secs(31)).await;
        assert_eq!(engine.current_chain().await.len(), 2);

        cancel_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
