//! Policy definition entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

/// One administratively configured password policy.
///
/// Rows are edited outside the engine; the engine only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PolicyDefinition {
    /// Row identifier.
    pub id: Uuid,
    /// Policy key (see [`super::PolicyKey`]). Kept as free text so that
    /// unrecognised keys reach the factory and are rejected there.
    pub key: String,
    /// Evaluation order; lower runs first.
    pub priority: i32,
    /// Only required policies enter the active chain.
    pub required: bool,
    /// Policy-specific parameters.
    pub validation_rules: Value,
    /// Last time an administrator touched this row.
    pub last_updated: DateTime<Utc>,
}

impl PolicyDefinition {
    /// Build a required definition stamped with the current time.
    pub fn new(key: impl Into<String>, priority: i32, validation_rules: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            key: key.into(),
            priority,
            required: true,
            validation_rules,
            last_updated: Utc::now(),
        }
    }

    /// Mark this definition as optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Override the last-updated timestamp.
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_updated = at;
        self
    }

    /// The rule map, or `None` if the stored value is not a JSON object.
    pub fn rules(&self) -> Option<&Map<String, Value>> {
        self.validation_rules.as_object()
    }
}
