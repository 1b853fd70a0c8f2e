//! Password length bounds.

use crate::rules::RuleSet;
use crate::validation::{ValidationInput, ValidationResult};

const DEFAULT_MIN_LENGTH: u32 = 8;
const DEFAULT_MAX_LENGTH: u32 = 128;

/// Valid iff `min_length <= chars(password) <= max_length`.
#[derive(Debug, Clone)]
pub struct SizeCheck {
    min_length: usize,
    max_length: usize,
}

impl SizeCheck {
    /// Build from `minLength` / `maxLength`.
    pub fn from_rules(rules: &RuleSet<'_>) -> Self {
        Self {
            min_length: rules.u32_or("minLength", DEFAULT_MIN_LENGTH) as usize,
            max_length: rules.u32_or("maxLength", DEFAULT_MAX_LENGTH) as usize,
        }
    }

    pub(crate) fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let Some(password) = input.password else {
            return ValidationResult::valid();
        };

        let length = password.chars().count();
        if length < self.min_length || length > self.max_length {
            return ValidationResult::invalid(format!(
                "Password length must be between {} and {} characters",
                self.min_length, self.max_length
            ));
        }
        ValidationResult::valid()
    }
}
