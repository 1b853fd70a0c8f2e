//! Validation engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for the validation engine and its staleness poller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Whether the staleness poller runs.
    #[serde(default = "default_true")]
    pub poll_enabled: bool,
    /// Interval in seconds between policy-store staleness checks.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_enabled: default_true(),
            poll_interval_seconds: default_poll_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    60
}
