//! Breach-lookup client configuration.

use serde::{Deserialize, Serialize};

/// Settings for the k-anonymity breach-lookup HTTP API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachConfig {
    /// Base URL; the digest prefix is appended as the final path segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds. Applies to the whole request.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// `User-Agent` header sent with each lookup.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BreachConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.pwnedpasswords.com/range".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_user_agent() -> String {
    concat!("pwguard/", env!("CARGO_PKG_VERSION")).to_string()
}
