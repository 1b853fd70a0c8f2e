//! PostgreSQL-backed collaborators.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pwguard_core::result::AppResult;
use pwguard_database::repositories::{
    AccountSettingsRepository, PasswordHistoryRepository, PolicyRepository,
};
use pwguard_entity::history::StoredCredential;
use pwguard_entity::policy::PolicyDefinition;

use super::{PasswordHistoryStore, PolicyStore, TenantSettingsProvider};

#[async_trait]
impl PolicyStore for PolicyRepository {
    async fn list_required_ordered_by_priority(&self) -> AppResult<Vec<PolicyDefinition>> {
        self.find_required_ordered().await
    }

    async fn max_last_updated(&self) -> AppResult<Option<DateTime<Utc>>> {
        PolicyRepository::max_last_updated(self).await
    }
}

#[async_trait]
impl PasswordHistoryStore for PasswordHistoryRepository {
    async fn last_change_timestamp(&self, username: &str) -> AppResult<Option<DateTime<Utc>>> {
        self.last_change(username).await
    }

    async fn recent_history(
        &self,
        username: &str,
        limit: u32,
    ) -> AppResult<Vec<StoredCredential>> {
        let entries = self.find_recent(username, limit).await?;
        Ok(entries.into_iter().map(StoredCredential::from).collect())
    }
}

#[async_trait]
impl TenantSettingsProvider for AccountSettingsRepository {
    async fn password_encoder_id(&self) -> AppResult<Option<String>> {
        Ok(self.find().await?.and_then(|s| s.password_encoder))
    }
}
