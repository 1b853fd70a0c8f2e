//! Collaborators the engine reads from.
//!
//! Two implementations are provided for each trait:
//! - PostgreSQL, wrapping the `pwguard-database` repositories
//! - In-memory, for tests and embedding without a database

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pwguard_core::result::AppResult;
use pwguard_entity::history::StoredCredential;
use pwguard_entity::policy::PolicyDefinition;

pub use memory::{MemoryHistoryStore, MemoryPolicyStore, StaticTenantSettings};

/// Source of administrator-edited policy definitions.
#[async_trait]
pub trait PolicyStore: Send + Sync + std::fmt::Debug + 'static {
    /// Every `required = true` definition, lowest priority first.
    async fn list_required_ordered_by_priority(&self) -> AppResult<Vec<PolicyDefinition>>;

    /// The newest `last_updated` across all definitions.
    async fn max_last_updated(&self) -> AppResult<Option<DateTime<Utc>>>;
}

/// Source of a user's previous passwords.
#[async_trait]
pub trait PasswordHistoryStore: Send + Sync + std::fmt::Debug + 'static {
    /// When the user last changed their password.
    async fn last_change_timestamp(&self, username: &str) -> AppResult<Option<DateTime<Utc>>>;

    /// Up to `limit` previous credentials, most recent first.
    async fn recent_history(&self, username: &str, limit: u32)
    -> AppResult<Vec<StoredCredential>>;
}

/// Tenant-level settings the factory needs.
#[async_trait]
pub trait TenantSettingsProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Identifier of the encoder passwords are stored with.
    async fn password_encoder_id(&self) -> AppResult<Option<String>>;
}
