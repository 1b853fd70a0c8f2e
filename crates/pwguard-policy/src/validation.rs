//! Per-call validation input and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pwguard_entity::policy::PolicyKey;

/// Everything a check may look at for one validation call.
#[derive(Debug, Clone, Copy)]
pub struct ValidationInput<'a> {
    /// Account name.
    pub username: Option<&'a str>,
    /// Candidate password. `None` means an expiry-only query.
    pub password: Option<&'a str>,
    /// When the account last changed its password, for existing accounts.
    pub last_password_change_time: Option<DateTime<Utc>>,
}

impl<'a> ValidationInput<'a> {
    /// Input for a password chosen during account creation.
    pub fn new_user(username: &'a str, password: &'a str) -> Self {
        Self {
            username: Some(username),
            password: Some(password),
            last_password_change_time: None,
        }
    }

    /// Input for a password change on an existing account.
    pub fn existing_user(
        username: &'a str,
        password: &'a str,
        last_password_change_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            username: Some(username),
            password: Some(password),
            last_password_change_time,
        }
    }

    /// Input asking only whether the current password has expired.
    pub fn expiry_only(username: &'a str) -> Self {
        Self {
            username: Some(username),
            password: None,
            last_password_change_time: None,
        }
    }
}

/// Outcome of a check or of a whole chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the password is acceptable.
    pub valid: bool,
    /// Reason for rejection; only set when `valid` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// An accepting result.
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    /// A rejecting result with a human-readable reason.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }

    /// Whether the password was accepted.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// The rejection reason, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Which slice of the chain a validation call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Account creation: no history, so expiration and cooldown are skipped.
    NewUser,
    /// Password change: every check runs.
    ExistingUser,
    /// Expiry query: only expiration checks run.
    ExpiryOnly,
}

impl ValidationMode {
    /// Whether checks of the given kind take part in this mode.
    pub fn includes(&self, key: PolicyKey) -> bool {
        match self {
            Self::NewUser => !key.requires_existing_account(),
            Self::ExistingUser => true,
            Self::ExpiryOnly => key == PolicyKey::Expiration,
        }
    }
}
