//! Tenant/account configuration.

use serde::{Deserialize, Serialize};

/// Where the password-encoder identifier is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncoderSource {
    /// Use [`TenantConfig::password_encoder`].
    #[default]
    Config,
    /// Read the `account_settings` table at every reload.
    Database,
}

/// Tenant-level settings consumed by the policy engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    /// Password-encoder identifier used for history comparison.
    #[serde(default = "default_encoder")]
    pub password_encoder: String,
    /// Source of the encoder identifier.
    #[serde(default)]
    pub source: EncoderSource,
}

impl Default for TenantConfig {
    fn default() -> Self {
        Self {
            password_encoder: default_encoder(),
            source: EncoderSource::default(),
        }
    }
}

fn default_encoder() -> String {
    "argon2".to_string()
}
