//! The hot-reloadable validation engine.
//!
//! The active chain lives behind a `tokio::sync::RwLock<Arc<ChainSnapshot>>`.
//! A validation takes the read lock just long enough to clone the `Arc`, then
//! runs every check against that one snapshot. A reload builds a complete
//! replacement first and takes the write lock only to swap the pointer, so a
//! slow breach lookup never holds up a reload and no validation ever sees a
//! half-built chain.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info};

use pwguard_core::types::{Clock, SystemClock};
use pwguard_entity::policy::PolicyKey;

use crate::breach::BreachLookup;
use crate::checks::PolicyCheck;
use crate::error::PolicyError;
use crate::factory::{CheckDependencies, CheckFactory};
use crate::store::{PasswordHistoryStore, PolicyStore, TenantSettingsProvider};
use crate::validation::{ValidationInput, ValidationMode, ValidationResult};

/// An immutable, priority-ordered chain of checks.
#[derive(Debug, Default)]
pub struct ChainSnapshot {
    checks: Vec<PolicyCheck>,
    source_updated_at: Option<DateTime<Utc>>,
    loaded_at: Option<DateTime<Utc>>,
}

impl ChainSnapshot {
    /// The checks in evaluation order.
    pub fn checks(&self) -> &[PolicyCheck] {
        &self.checks
    }

    /// Policy keys in evaluation order.
    pub fn keys(&self) -> Vec<PolicyKey> {
        self.checks.iter().map(PolicyCheck::key).collect()
    }

    /// Number of checks in the chain.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the chain has no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// The store's newest `last_updated` when this chain was read.
    pub fn source_updated_at(&self) -> Option<DateTime<Utc>> {
        self.source_updated_at
    }

    /// When this chain was published. `None` until the first reload.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// Builder for [`ValidationEngine`].
#[derive(Debug)]
pub struct ValidationEngineBuilder {
    policies: Arc<dyn PolicyStore>,
    breach: Arc<dyn BreachLookup>,
    history: Option<Arc<dyn PasswordHistoryStore>>,
    tenant: Option<Arc<dyn TenantSettingsProvider>>,
    clock: Arc<dyn Clock>,
}

impl ValidationEngineBuilder {
    /// Set the password history store.
    pub fn history_store(mut self, history: Arc<dyn PasswordHistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Set the tenant settings provider.
    pub fn tenant_settings(mut self, tenant: Arc<dyn TenantSettingsProvider>) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Override the clock (defaults to the system clock).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the engine with an empty chain. Call
    /// [`ValidationEngine::reload`] before serving traffic.
    pub fn build(self) -> ValidationEngine {
        ValidationEngine {
            policies: self.policies,
            breach: self.breach,
            history: self.history,
            tenant: self.tenant,
            clock: self.clock,
            chain: RwLock::new(Arc::new(ChainSnapshot::default())),
            reload_lock: Mutex::new(()),
        }
    }
}

/// Runs the active policy chain and swaps it atomically on reload.
#[derive(Debug)]
pub struct ValidationEngine {
    policies: Arc<dyn PolicyStore>,
    breach: Arc<dyn BreachLookup>,
    history: Option<Arc<dyn PasswordHistoryStore>>,
    tenant: Option<Arc<dyn TenantSettingsProvider>>,
    clock: Arc<dyn Clock>,
    chain: RwLock<Arc<ChainSnapshot>>,
    reload_lock: Mutex<()>,
}

impl ValidationEngine {
    /// Start building an engine over a policy store and a breach client.
    pub fn builder(
        policies: Arc<dyn PolicyStore>,
        breach: Arc<dyn BreachLookup>,
    ) -> ValidationEngineBuilder {
        ValidationEngineBuilder {
            policies,
            breach,
            history: None,
            tenant: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// The chain currently in force.
    pub async fn current_chain(&self) -> Arc<ChainSnapshot> {
        Arc::clone(&*self.chain.read().await)
    }

    /// Validate a password chosen at account creation.
    ///
    /// Expiration and cooldown checks are skipped; a new account has no
    /// history for them to look at.
    pub async fn validate_new_user_password(
        &self,
        password: &str,
        username: &str,
    ) -> ValidationResult {
        self.run(
            ValidationMode::NewUser,
            ValidationInput::new_user(username, password),
        )
        .await
    }

    /// Validate a password change on an existing account.
    pub async fn validate_existing_user_password(
        &self,
        password: &str,
        username: &str,
        last_password_change_time: Option<DateTime<Utc>>,
    ) -> ValidationResult {
        self.run(
            ValidationMode::ExistingUser,
            ValidationInput::existing_user(username, password, last_password_change_time),
        )
        .await
    }

    /// Report whether the user's current password has expired.
    pub async fn check_password_expiry(&self, username: &str) -> ValidationResult {
        self.run(
            ValidationMode::ExpiryOnly,
            ValidationInput::expiry_only(username),
        )
        .await
    }

    async fn run(&self, mode: ValidationMode, input: ValidationInput<'_>) -> ValidationResult {
        let chain = self.current_chain().await;

        for check in chain.checks.iter().filter(|c| mode.includes(c.key())) {
            let result = check.evaluate(&input).await;
            if !result.is_valid() {
                debug!(
                    policy = %check.key(),
                    mode = ?mode,
                    username = input.username.unwrap_or_default(),
                    "Password rejected"
                );
                return result;
            }
        }

        debug!(
            mode = ?mode,
            checks = chain.len(),
            username = input.username.unwrap_or_default(),
            "Password accepted"
        );
        ValidationResult::valid()
    }

    /// Re-read every required definition and publish a new chain.
    ///
    /// Either every definition builds and the new chain replaces the old one
    /// in a single swap, or the error is returned and the previous chain
    /// stays in force. Concurrent reloads run one at a time.
    pub async fn reload(&self) -> Result<Arc<ChainSnapshot>, PolicyError> {
        let _guard = self.reload_lock.lock().await;

        match self.build_snapshot().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.chain.write().await = Arc::clone(&snapshot);

                info!(
                    checks = snapshot.len(),
                    keys = ?snapshot.keys(),
                    source_updated_at = ?snapshot.source_updated_at,
                    "Policy chain reloaded"
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!(error = %e, "Policy reload aborted; previous chain kept");
                Err(e)
            }
        }
    }

    async fn build_snapshot(&self) -> Result<ChainSnapshot, PolicyError> {
        let source_updated_at = self.policies.max_last_updated().await?;
        let mut definitions = self.policies.list_required_ordered_by_priority().await?;
        definitions.retain(|d| d.required);
        definitions.sort_by_key(|d| d.priority);

        let encoder_id = match &self.tenant {
            Some(tenant) => tenant.password_encoder_id().await?,
            None => None,
        };

        let factory = CheckFactory::new(CheckDependencies {
            history: self.history.clone(),
            encoder_id,
            breach: Arc::clone(&self.breach),
            clock: Arc::clone(&self.clock),
        })?;

        let checks = definitions
            .iter()
            .map(|definition| factory.build(definition))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ChainSnapshot {
            checks,
            source_updated_at,
            loaded_at: Some(self.clock.now()),
        })
    }

    /// Reload if the store changed since the current chain was read.
    ///
    /// Returns whether a reload happened. A chain that was never loaded
    /// always counts as stale.
    pub async fn refresh_if_stale(&self) -> Result<bool, PolicyError> {
        let current = self.current_chain().await;
        let latest = self.policies.max_last_updated().await?;

        if current.loaded_at.is_some() && latest == current.source_updated_at {
            return Ok(false);
        }

        debug!(
            observed = ?current.source_updated_at,
            latest = ?latest,
            "Policy definitions changed"
        );
        self.reload().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::BreachLookupError;
    use crate::store::{MemoryHistoryStore, MemoryPolicyStore, StaticTenantSettings};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use pwguard_core::types::ManualClock;
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

    fn engine(store: Arc<MemoryPolicyStore>) -> ValidationEngine {
        ValidationEngine::builder(store, Arc::new(NoBreach))
            .history_store(Arc::new(MemoryHistoryStore::new()))
            .tenant_settings(Arc::new(StaticTenantSettings::new("argon2")))
            .build()
    }

    #[tokio::test]
    async fn test_unloaded_engine_accepts_everything() {
        let engine = engine(Arc::new(MemoryPolicyStore::new()));
        let chain = engine.current_chain().await;
        assert!(chain.is_empty());
        assert!(chain.loaded_at().is_none());
        assert!(engine.validate_new_user_password("x", "john").await.is_valid());
    }

    #[tokio::test]
    async fn test_reload_orders_by_priority_and_skips_optional() {
        let store = Arc::new(MemoryPolicyStore::with_definitions(vec![
            PolicyDefinition::new("complexity", 20, json!({})),
            PolicyDefinition::new("special_characters", 5, json!({})).optional(),
            PolicyDefinition::new("size", 10, json!({})),
        ]));
        let engine = engine(store);

        let chain = engine.reload().await.unwrap();
        assert_eq!(chain.keys(), vec![PolicyKey::Size, PolicyKey::Complexity]);
        assert!(chain.loaded_at().is_some());
    }

    #[tokio::test]
    async fn test_reload_stamps_with_injected_clock() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let store = Arc::new(MemoryPolicyStore::with_definitions(vec![
            PolicyDefinition::new("size", 1, json!({})).updated_at(at),
        ]));
        let engine = ValidationEngine::builder(store, Arc::new(NoBreach))
            .history_store(Arc::new(MemoryHistoryStore::new()))
            .tenant_settings(Arc::new(StaticTenantSettings::new("sha256")))
            .clock(Arc::new(ManualClock::new(at)))
            .build();

        let chain = engine.reload().await.unwrap();
        assert_eq!(chain.loaded_at(), Some(at));
        assert_eq!(chain.source_updated_at(), Some(at));
    }

    #[tokio::test]
    async fn test_reload_without_history_store_fails() {
        let store = Arc::new(MemoryPolicyStore::with_definitions(vec![
            PolicyDefinition::new("size", 1, json!({})),
        ]));
        let engine = ValidationEngine::builder(store, Arc::new(NoBreach))
            .tenant_settings(Arc::new(StaticTenantSettings::new("argon2")))
            .build();

        assert!(matches!(
            engine.reload().await,
            Err(PolicyError::MissingDependency("password history store"))
        ));
        assert!(engine.current_chain().await.is_empty());
    }

    #[tokio::test]
    async fn test_reload_with_unset_encoder_fails() {
        let store = Arc::new(MemoryPolicyStore::new());
        let engine = ValidationEngine::builder(store, Arc::new(NoBreach))
            .history_store(Arc::new(MemoryHistoryStore::new()))
            .tenant_settings(Arc::new(StaticTenantSettings::unset()))
            .build();

        assert!(matches!(
            engine.reload().await,
            Err(PolicyError::MissingDependency("password encoder identifier"))
        ));
    }

    #[tokio::test]
    async fn test_refresh_if_stale_first_call_loads() {
        let store = Arc::new(MemoryPolicyStore::new());
        let engine = engine(store);

        assert!(engine.refresh_if_stale().await.unwrap());
        assert!(engine.current_chain().await.loaded_at().is_some());
        assert!(!engine.refresh_if_stale().await.unwrap());
    }
}
