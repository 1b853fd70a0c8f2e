//! Minimum interval between password changes.

use std::sync::Arc;

use chrono::Duration;

use pwguard_core::types::Clock;

use crate::rules::RuleSet;
use crate::validation::{ValidationInput, ValidationResult};

const DEFAULT_INTERVAL_SECS: u32 = 60;

/// Rejects a change made sooner than the configured interval after the last one.
#[derive(Debug, Clone)]
pub struct CooldownCheck {
    interval: Duration,
    clock: Arc<dyn Clock>,
}

impl CooldownCheck {
    /// Build from `passwordUpdateTimeIntervalSec`.
    pub fn from_rules(rules: &RuleSet<'_>, clock: Arc<dyn Clock>) -> Self {
        let secs = rules.u32_or("passwordUpdateTimeIntervalSec", DEFAULT_INTERVAL_SECS);
        Self {
            interval: Duration::seconds(i64::from(secs)),
            clock,
        }
    }

    pub(crate) fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let Some(last_change) = input.last_password_change_time else {
            return ValidationResult::valid();
        };

        let elapsed = self.clock.now() - last_change;
        if elapsed < self.interval {
            return ValidationResult::invalid(format!(
                "Password was changed too recently; wait at least {} seconds between changes",
                self.interval.num_seconds()
            ));
        }
        ValidationResult::valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pwguard_core::types::ManualClock;
    use serde_json::json;

    fn check() -> (CooldownCheck, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ));
        let rules = json!({"passwordUpdateTimeIntervalSec": 60});
        let check = CooldownCheck::from_rules(&RuleSet::new(rules.as_object()), clock.clone());
        (check, clock)
    }

    #[test]
    fn test_interval_enforced() {
        let (check, clock) = check();
        let now = clock.now();

        let recent = ValidationInput::existing_user("u", "p", Some(now - Duration::seconds(30)));
        assert!(!check.evaluate(&recent).is_valid());

        let old = ValidationInput::existing_user("u", "p", Some(now - Duration::seconds(120)));
        assert!(check.evaluate(&old).is_valid());

        let none = ValidationInput::existing_user("u", "p", None);
        assert!(check.evaluate(&none).is_valid());
    }

    #[test]
    fn test_clock_moves_past_cooldown() {
        let (check, clock) = check();
        let changed = clock.now();
        let input = ValidationInput::existing_user("u", "p", Some(changed));
        assert!(!check.evaluate(&input).is_valid());

        clock.advance(Duration::seconds(60));
        assert!(check.evaluate(&input).is_valid());
    }

    #[test]
    fn test_u32_max_interval() {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        ));
        let rules = json!({"passwordUpdateTimeIntervalSec": u32::MAX});
        let check = CooldownCheck::from_rules(&RuleSet::new(rules.as_object()), clock.clone());

        let last_year = clock.now() - Duration::days(365);
        let input = ValidationInput::existing_user("u", "p", Some(last_year));
        let result = check.evaluate(&input);
        assert!(result.message().unwrap().contains("4294967295 seconds"));

        clock.advance(Duration::seconds(i64::from(u32::MAX)));
        assert!(check.evaluate(&input).is_valid());
    }
}
