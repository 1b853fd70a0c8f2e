//! Password age and reuse history.
//!
//! Without a candidate password the check answers "has the current
//! password expired?". With one it answers "was this password used
//! recently?".

use std::sync::Arc;

use chrono::Duration;
use tracing::error;

use pwguard_core::types::Clock;

use crate::encoder::PasswordEncoder;
use crate::rules::RuleSet;
use crate::store::PasswordHistoryStore;
use crate::validation::{ValidationInput, ValidationResult};

const DEFAULT_EXPIRY_DAYS: u32 = 90;
const DEFAULT_HISTORY_COUNT: u32 = 0;

/// Expiry and reuse check backed by the password history store.
#[derive(Debug, Clone)]
pub struct ExpirationCheck {
    expiry_days: u32,
    history_count: u32,
    history: Arc<dyn PasswordHistoryStore>,
    encoder: PasswordEncoder,
    clock: Arc<dyn Clock>,
}

impl ExpirationCheck {
    /// Build from `passwordExpiryDays` / `passwordHistoryCount`. A zero
    /// expiry falls back to the default.
    pub fn from_rules(
        rules: &RuleSet<'_>,
        history: Arc<dyn PasswordHistoryStore>,
        encoder: PasswordEncoder,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            expiry_days: rules.positive_u32_or("passwordExpiryDays", DEFAULT_EXPIRY_DAYS),
            history_count: rules.u32_or("passwordHistoryCount", DEFAULT_HISTORY_COUNT),
            history,
            encoder,
            clock,
        }
    }

    pub(crate) async fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        let Some(username) = input.username else {
            return ValidationResult::valid();
        };

        match input.password {
            None => self.check_expiry(username).await,
            Some(password) => self.check_reuse(username, password).await,
        }
    }

    async fn check_expiry(&self, username: &str) -> ValidationResult {
        let last_change = match self.history.last_change_timestamp(username).await {
            Ok(Some(at)) => at,
            Ok(None) => return ValidationResult::valid(),
            Err(e) => {
                error!(username = %username, error = %e, "Failed to read last password change");
                return ValidationResult::invalid("Password expiry could not be verified");
            }
        };

        // An expiry date past the calendar range never arrives.
        let Some(expires_on) = Duration::try_days(i64::from(self.expiry_days))
            .and_then(|period| last_change.checked_add_signed(period))
            .map(|at| at.date_naive())
        else {
            return ValidationResult::valid();
        };

        if self.clock.now().date_naive() > expires_on {
            return ValidationResult::invalid(format!(
                "Password expired on {expires_on}; passwords must be changed every {} days",
                self.expiry_days
            ));
        }
        ValidationResult::valid()
    }

    async fn check_reuse(&self, username: &str, password: &str) -> ValidationResult {
        if self.history_count == 0 {
            return ValidationResult::valid();
        }

        let previous = match self.history.recent_history(username, self.history_count).await {
            Ok(previous) => previous,
            Err(e) => {
                error!(username = %username, error = %e, "Failed to read password history");
                return ValidationResult::invalid("Password history could not be verified");
            }
        };

        if previous
            .iter()
            .any(|stored| self.encoder.matches(password, stored))
        {
            return ValidationResult::invalid(format!(
                "Password must not match any of the last {} passwords",
                self.history_count
            ));
        }
        ValidationResult::valid()
    }
}
