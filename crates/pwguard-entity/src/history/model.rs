//! Password history entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A previously used password for an account.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PasswordHistoryEntry {
    /// Row identifier.
    pub id: Uuid,
    /// Account the password belonged to.
    pub username: String,
    /// Salt used by salted encoders. Empty for self-describing hashes.
    #[serde(skip_serializing)]
    pub salt: String,
    /// Encoded password.
    #[serde(skip_serializing)]
    pub hash: String,
    /// When the password was set.
    pub changed_at: DateTime<Utc>,
}

/// The salt/hash pair a history comparison needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    /// Salt, possibly empty.
    pub salt: String,
    /// Encoded password.
    pub hash: String,
}

impl From<PasswordHistoryEntry> for StoredCredential {
    fn from(entry: PasswordHistoryEntry) -> Self {
        Self {
            salt: entry.salt,
            hash: entry.hash,
        }
    }
}
