//! Special-character minimum.

use crate::rules::RuleSet;
use crate::validation::{ValidationInput, ValidationResult};

const DEFAULT_ALLOWED: &str = "!@#$%^&*()_-+=<>?";

/// Counts characters that are allowed and not excluded.
#[derive(Debug, Clone)]
pub struct SpecialCharactersCheck {
    allowed: String,
    excluded: String,
    min_special: usize,
}

impl SpecialCharactersCheck {
    /// Build from `allowedSpecialChars`, `excludedSpecialChars`, and `minSpecialChars`.
    pub fn from_rules(rules: &RuleSet<'_>) -> Self {
        Self {
            allowed: rules.string_or("allowedSpecialChars", DEFAULT_ALLOWED),
            excluded: rules.string_or("excludedSpecialChars", ""),
            min_special: rules.u32_or("minSpecialChars", 1) as usize,
        }
    }

    fn counts(&self, c: char) -> bool {
        self.allowed.contains(c) && !self.excluded.contains(c)
    }

    pub(crate) fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let Some(password) = input.password else {
            return ValidationResult::valid();
        };

        let found = password.chars().filter(|c| self.counts(*c)).count();
        if found < self.min_special {
            let usable: String = self
                .allowed
                .chars()
                .filter(|c| !self.excluded.contains(*c))
                .collect();
            return ValidationResult::invalid(format!(
                "Password must contain at least {} special character(s) from '{}'",
                self.min_special, usable
            ));
        }
        ValidationResult::valid()
    }
}
