//! In-memory collaborators for tests and single-process embedding.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use pwguard_core::config::TenantConfig;
use pwguard_core::error::AppError;
use pwguard_core::result::AppResult;
use pwguard_entity::history::StoredCredential;
use pwguard_entity::policy::PolicyDefinition;

use super::{PasswordHistoryStore, PolicyStore, TenantSettingsProvider};

/// Policy definitions held in memory.
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    definitions: RwLock<Vec<PolicyDefinition>>,
    unavailable: AtomicBool,
    list_calls: AtomicUsize,
}

impl MemoryPolicyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with definitions.
    pub fn with_definitions(definitions: Vec<PolicyDefinition>) -> Self {
        Self {
            definitions: RwLock::new(definitions),
            ..Self::default()
        }
    }

    /// Insert a definition, replacing any existing one with the same key.
    pub async fn upsert(&self, definition: PolicyDefinition) {
        let mut definitions = self.definitions.write().await;
        definitions.retain(|d| !d.key.eq_ignore_ascii_case(&definition.key));
        definitions.push(definition);
    }

    /// Remove the definition with the given key.
    pub async fn remove(&self, key: &str) -> bool {
        let mut definitions = self.definitions.write().await;
        let before = definitions.len();
        definitions.retain(|d| !d.key.eq_ignore_ascii_case(key));
        definitions.len() != before
    }

    /// Make every read fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// How many times the definitions have been listed.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable("Policy store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn list_required_ordered_by_priority(&self) -> AppResult<Vec<PolicyDefinition>> {
        self.ensure_available()?;
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let mut required: Vec<PolicyDefinition> = self
            .definitions
            .read()
            .await
            .iter()
            .filter(|d| d.required)
            .cloned()
            .collect();
        required.sort_by_key(|d| d.priority);
        Ok(required)
    }

    async fn max_last_updated(&self) -> AppResult<Option<DateTime<Utc>>> {
        self.ensure_available()?;
        Ok(self
            .definitions
            .read()
            .await
            .iter()
            .map(|d| d.last_updated)
            .max())
    }
}

/// Password history held in memory, keyed by lowercase username.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    entries: RwLock<HashMap<String, Vec<(DateTime<Utc>, StoredCredential)>>>,
    unavailable: AtomicBool,
}

impl MemoryHistoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a credential a user set at `changed_at`.
    pub async fn record(&self, username: &str, changed_at: DateTime<Utc>, credential: StoredCredential) {
        self.entries
            .write()
            .await
            .entry(username.to_lowercase())
            .or_default()
            .push((changed_at, credential));
    }

    /// Make every read fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::service_unavailable(
                "Password history store is unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PasswordHistoryStore for MemoryHistoryStore {
    async fn last_change_timestamp(&self, username: &str) -> AppResult<Option<DateTime<Utc>>> {
        self.ensure_available()?;
        Ok(self
            .entries
            .read()
            .await
            .get(&username.to_lowercase())
            .and_then(|entries| entries.iter().map(|(at, _)| *at).max()))
    }

    async fn recent_history(
        &self,
        username: &str,
        limit: u32,
    ) -> AppResult<Vec<StoredCredential>> {
        self.ensure_available()?;
        let entries = self.entries.read().await;
        let Some(user_entries) = entries.get(&username.to_lowercase()) else {
            return Ok(Vec::new());
        };

        let mut sorted: Vec<&(DateTime<Utc>, StoredCredential)> = user_entries.iter().collect();
        sorted.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(sorted
            .into_iter()
            .take(limit as usize)
            .map(|(_, credential)| credential.clone())
            .collect())
    }
}

/// Tenant settings fixed at construction time.
#[derive(Debug, Clone, Default)]
pub struct StaticTenantSettings {
    password_encoder: Option<String>,
}

impl StaticTenantSettings {
    /// Settings naming the given encoder.
    pub fn new(password_encoder: impl Into<String>) -> Self {
        Self {
            password_encoder: Some(password_encoder.into()),
        }
    }

    /// Settings with no encoder configured.
    pub fn unset() -> Self {
        Self::default()
    }

    /// Settings taken from the `[tenant]` config section.
    pub fn from_config(config: &TenantConfig) -> Self {
        let encoder = config.password_encoder.trim();
        Self {
            password_encoder: (!encoder.is_empty()).then(|| encoder.to_string()),
        }
    }
}

#[async_trait]
impl TenantSettingsProvider for StaticTenantSettings {
    async fn password_encoder_id(&self) -> AppResult<Option<String>> {
        Ok(self.password_encoder.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[tokio::test]
    async fn test_policy_store_orders_and_filters() {
        let store = MemoryPolicyStore::with_definitions(vec![
            PolicyDefinition::new("complexity", 2, json!({})),
            PolicyDefinition::new("size", 1, json!({})),
            PolicyDefinition::new("special_characters", 0, json!({})).optional(),
        ]);

        let listed = store.list_required_ordered_by_priority().await.unwrap();
        let keys: Vec<&str> = listed.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["size", "complexity"]);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_policy_store_upsert_replaces_key() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryPolicyStore::new();
        store
            .upsert(PolicyDefinition::new("size", 1, json!({})).updated_at(t0))
            .await;
        store
            .upsert(PolicyDefinition::new("SIZE", 5, json!({})).updated_at(t0 + Duration::hours(1)))
            .await;

        let listed = store.list_required_ordered_by_priority().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].priority, 5);
        assert_eq!(
            store.max_last_updated().await.unwrap(),
            Some(t0 + Duration::hours(1))
        );
    }

    #[tokio::test]
    async fn test_policy_store_unavailable() {
        let store = MemoryPolicyStore::new();
        store.set_unavailable(true);
        assert!(store.list_required_ordered_by_priority().await.is_err());
        assert!(store.max_last_updated().await.is_err());
    }

    #[tokio::test]
    async fn test_history_most_recent_first() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let store = MemoryHistoryStore::new();
        for (i, hash) in ["old", "newest", "middle"].iter().enumerate() {
            let at = match i {
                0 => t0,
                1 => t0 + Duration::days(20),
                _ => t0 + Duration::days(10),
            };
            store
                .record(
                    "Alice",
                    at,
                    StoredCredential {
                        salt: String::new(),
                        hash: hash.to_string(),
                    },
                )
                .await;
        }

        let recent = store.recent_history("alice", 2).await.unwrap();
        let hashes: Vec<&str> = recent.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(hashes, vec!["newest", "middle"]);
        assert_eq!(
            store.last_change_timestamp("ALICE").await.unwrap(),
            Some(t0 + Duration::days(20))
        );
        assert!(store.recent_history("bob", 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_tenant_settings_from_config() {
        let settings = StaticTenantSettings::from_config(&TenantConfig::default());
        assert_eq!(
            settings.password_encoder_id().await.unwrap().as_deref(),
            Some("argon2")
        );
        assert!(StaticTenantSettings::unset().password_encoder_id().await.unwrap().is_none());
    }
}
