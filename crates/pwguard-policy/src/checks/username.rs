//! Username-fragment exclusion.

use crate::rules::RuleSet;
use crate::validation::{ValidationInput, ValidationResult};

const DEFAULT_SEQUENCE_LENGTH: u32 = 3;

/// Rejects passwords that contain any run of `sequence_length` consecutive
/// username characters, ignoring case.
#[derive(Debug, Clone)]
pub struct UsernameExclusionCheck {
    sequence_length: usize,
}

impl UsernameExclusionCheck {
    /// Build from `noOfCharsSeqinUserField`; zero falls back to the default.
    pub fn from_rules(rules: &RuleSet<'_>) -> Self {
        Self {
            sequence_length: rules.positive_u32_or("noOfCharsSeqinUserField", DEFAULT_SEQUENCE_LENGTH)
                as usize,
        }
    }

    pub(crate) fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let (Some(username), Some(password)) = (input.username, input.password) else {
            return ValidationResult::valid();
        };

        let username: Vec<char> = username.to_lowercase().chars().collect();
        if username.len() < self.sequence_length {
            return ValidationResult::valid();
        }

        let password = password.to_lowercase();
        let leaked = username
            .windows(self.sequence_length)
            .map(|window| window.iter().collect::<String>())
            .any(|fragment| password.contains(&fragment));

        if leaked {
            return ValidationResult::invalid(format!(
                "Password must not contain {} or more consecutive characters of the username",
                self.sequence_length
            ));
        }
        ValidationResult::valid()
    }
}
