//! Breach-database lookup.
//!
//! Network and API failures are treated as "not found": the check fails
//! open and logs a warning. Deployments that prefer to reject passwords
//! when the lookup is down should not rely on this check alone.

use std::sync::Arc;

use sha1::{Digest, Sha1};
use tracing::warn;

use crate::breach::BreachLookup;
use crate::rules::RuleSet;
use crate::validation::{ValidationInput, ValidationResult};

const DEFAULT_PREFIX_LENGTH: u32 = 5;
const SHA1_HEX_LENGTH: usize = 40;

/// Rejects passwords whose SHA-1 digest appears in the breach range.
#[derive(Debug, Clone)]
pub struct CompromisedPasswordCheck {
    prefix_length: usize,
    client: Arc<dyn BreachLookup>,
}

impl CompromisedPasswordCheck {
    /// Build from `hashPrefixLength`; values outside 1..=39 fall back to 5.
    pub fn from_rules(rules: &RuleSet<'_>, client: Arc<dyn BreachLookup>) -> Self {
        let requested = rules.u32_or("hashPrefixLength", DEFAULT_PREFIX_LENGTH) as usize;
        let prefix_length = if (1..SHA1_HEX_LENGTH).contains(&requested) {
            requested
        } else {
            DEFAULT_PREFIX_LENGTH as usize
        };
        Self {
            prefix_length,
            client,
        }
    }

    pub(crate) async fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let Some(password) = input.password else {
            return ValidationResult::valid();
        };

        let digest = hex::encode_upper(Sha1::digest(password.as_bytes()));
        let (prefix, suffix) = digest.split_at(self.prefix_length);

        match self.client.range(prefix).await {
            Ok(body) => {
                if body.to_uppercase().contains(suffix) {
                    ValidationResult::invalid(
                        "Password has appeared in a known data breach; choose a different password",
                    )
                } else {
                    ValidationResult::valid()
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    prefix_length = self.prefix_length,
                    "Breach lookup failed; accepting password"
                );
                ValidationResult::valid()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breach::BreachLookupError;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    // SHA-1("password") = 5BAA61E4C9B93F3F0682250B6CF8331B7EE68FD8
    const PASSWORD_SUFFIX: &str = "1E4C9B93F3F0682250B6CF8331B7EE68FD8";

    #[derive(Debug, Default)]
    struct FakeRange {
        body: Option<String>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BreachLookup for FakeRange {
        async fn range(&self, prefix: &str) -> Result<String, BreachLookupError> {
            self.seen.lock().unwrap().push(prefix.to_string());
            self.body
                .clone()
                .ok_or_else(|| BreachLookupError::Other("connection reset".to_string()))
        }
    }

    fn check(rules: serde_json::Value, fake: Arc<FakeRange>) -> CompromisedPasswordCheck {
        CompromisedPasswordCheck::from_rules(&RuleSet::new(rules.as_object()), fake)
    }

    #[tokio::test]
    async fn test_suffix_in_range_is_rejected() {
        let fake = Arc::new(FakeRange {
            body: Some(format!("0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n{PASSWORD_SUFFIX}:9545824\r\n")),
            ..FakeRange::default()
        });
        let result = check(json!({}), fake.clone())
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;

        assert!(!result.is_valid());
        assert_eq!(fake.seen.lock().unwrap().as_slice(), ["5BAA6"]);
    }

    #[tokio::test]
    async fn test_lowercase_body_still_matches() {
        let fake = Arc::new(FakeRange {
            body: Some(format!("{}:3", PASSWORD_SUFFIX.to_lowercase())),
            ..FakeRange::default()
        });
        let result = check(json!({}), fake)
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert!(!result.is_valid());
    }

    #[tokio::test]
    async fn test_absent_suffix_is_accepted() {
        let fake = Arc::new(FakeRange {
            body: Some("0018A45C4D1DEF81644B54AB7F969B88D65:1".to_string()),
            ..FakeRange::default()
        });
        let result = check(json!({}), fake)
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert!(result.is_valid());
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_open() {
        let fake = Arc::new(FakeRange::default());
        let result = check(json!({}), fake)
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert!(result.is_valid());
        assert!(result.message().is_none());
    }

    #[tokio::test]
    async fn test_prefix_length_rule() {
        let fake = Arc::new(FakeRange {
            body: Some(String::new()),
            ..FakeRange::default()
        });
        check(json!({"hashPrefixLength": 3}), fake.clone())
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        check(json!({"hashPrefixLength": 40}), fake.clone())
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert_eq!(fake.seen.lock().unwrap().as_slice(), ["5BA", "5BAA6"]);
    }

    #[tokio::test]
    async fn test_u32_max_prefix_length_uses_default() {
        let fake = Arc::new(FakeRange {
            body: Some(String::new()),
            ..FakeRange::default()
        });
        check(json!({"hashPrefixLength": u32::MAX}), fake.clone())
            .evaluate(&ValidationInput::new_user("u", "password"))
            .await;
        assert_eq!(fake.seen.lock().unwrap().as_slice(), ["5BAA6"]);
    }
}
