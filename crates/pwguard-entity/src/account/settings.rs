//! Account settings entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tenant-wide account settings row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AccountSettings {
    /// Singleton row identifier.
    pub id: i32,
    /// Identifier of the encoder used to store passwords.
    pub password_encoder: Option<String>,
    /// When the settings were last changed.
    pub updated_at: DateTime<Utc>,
}
