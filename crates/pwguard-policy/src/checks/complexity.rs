//! Character-class minimums.

use crate::rules::RuleSet;
use crate::validation::{ValidationInput, ValidationResult};

/// Requires minimum counts of uppercase, lowercase, and digit characters.
#[derive(Debug, Clone)]
pub struct ComplexityCheck {
    min_uppercase: usize,
    min_lowercase: usize,
    min_digits: usize,
}

impl ComplexityCheck {
    /// Build from `minUppercase` / `minLowercase` / `minDigits` (each defaults to 1).
    pub fn from_rules(rules: &RuleSet<'_>) -> Self {
        Self {
            min_uppercase: rules.u32_or("minUppercase", 1) as usize,
            min_lowercase: rules.u32_or("minLowercase", 1) as usize,
            min_digits: rules.u32_or("minDigits", 1) as usize,
        }
    }

    pub(crate) fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let Some(password) = input.password else {
            return ValidationResult::valid();
        };

        let (mut upper, mut lower, mut digits) = (0usize, 0usize, 0usize);
        for c in password.chars() {
            if c.is_uppercase() {
                upper += 1;
            } else if c.is_lowercase() {
                lower += 1;
            } else if c.is_ascii_digit() {
                digits += 1;
            }
        }

        if upper < self.min_uppercase {
            return ValidationResult::invalid(format!(
                "Password must contain at least {} uppercase letter(s)",
                self.min_uppercase
            ));
        }
        if lower < self.min_lowercase {
            return ValidationResult::invalid(format!(
                "Password must contain at least {} lowercase letter(s)",
                self.min_lowercase
            ));
        }
        if digits < self.min_digits {
            return ValidationResult::invalid(format!(
                "Password must contain at least {} digit(s)",
                self.min_digits
            ));
        }
        ValidationResult::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eval(rules: serde_json::Value, password: &str) -> ValidationResult {
        ComplexityCheck::from_rules(&RuleSet::new(rules.as_object()))
            .evaluate(&ValidationInput::new_user("user", password))
    }

    #[test]
    fn test_configured_minimums() {
        let rules = json!({"minUppercase": 2, "minLowercase": 3, "minDigits": 1});
        assert!(eval(rules.clone(), "AaBbc1").is_valid());

        let upper = eval(rules.clone(), "aabb1");
        assert!(!upper.is_valid());
        assert!(upper.message().unwrap().contains("uppercase"));

        let lower = eval(rules.clone(), "AABB1");
        assert!(!lower.is_valid());
        assert!(lower.message().unwrap().contains("lowercase"));

        let digit = eval(rules, "AaBbCc");
        assert!(!digit.is_valid());
        assert!(digit.message().unwrap().contains("digit"));
    }

    #[test]
    fn test_defaults_require_one_of_each() {
        assert!(eval(json!({}), "aB3").is_valid());
        assert!(!eval(json!({}), "ab3").is_valid());
        assert!(!eval(json!({}), "AB3").is_valid());
        assert!(!eval(json!({}), "aBc").is_valid());
    }

    #[test]
    fn test_zero_minimum_disables_class() {
        assert!(eval(json!({"minDigits": 0}), "aBc").is_valid());
    }

    #[test]
    fn test_u32_max_minimums_reject() {
        let result = eval(json!({"minUppercase": u32::MAX}), "AaBb1");
        assert!(result.message().unwrap().contains("4294967295 uppercase"));
        assert!(!eval(json!({"minDigits": u32::MAX.to_string()}), "aB123").is_valid());
    }
}
