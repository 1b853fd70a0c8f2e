//! Policy key enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of password policy the engine knows how to build.
///
/// Each [`super::PolicyDefinition`] row names one of these through its
/// `key` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKey {
    /// Minimum and maximum password length.
    Size,
    /// Minimum counts of uppercase, lowercase, and digit characters.
    Complexity,
    /// Minimum count of allowed special characters.
    SpecialCharacters,
    /// Breach-database lookup.
    CompromisedPassword,
    /// Password must not contain fragments of the username.
    UsernameExclusion,
    /// Password age and reuse history.
    Expiration,
    /// Minimum interval between password changes.
    LastUpdate,
}

impl PolicyKey {
    /// Every key, in declaration order.
    pub const ALL: [PolicyKey; 7] = [
        Self::Size,
        Self::Complexity,
        Self::SpecialCharacters,
        Self::CompromisedPassword,
        Self::UsernameExclusion,
        Self::Expiration,
        Self::LastUpdate,
    ];

    /// Return the key as stored in the policy table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Complexity => "complexity",
            Self::SpecialCharacters => "special_characters",
            Self::CompromisedPassword => "compromised_password",
            Self::UsernameExclusion => "username_exclusion",
            Self::Expiration => "expiration",
            Self::LastUpdate => "last_update",
        }
    }

    /// Whether checks of this kind only make sense for existing accounts.
    pub fn requires_existing_account(&self) -> bool {
        matches!(self, Self::Expiration | Self::LastUpdate)
    }
}

impl fmt::Display for PolicyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PolicyKey {
    type Err = pwguard_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| {
                pwguard_core::AppError::policy(format!("Unknown policy key: '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        assert_eq!("size".parse::<PolicyKey>().unwrap(), PolicyKey::Size);
        assert_eq!(
            "Username_Exclusion".parse::<PolicyKey>().unwrap(),
            PolicyKey::UsernameExclusion
        );
        assert_eq!(
            " last_update ".parse::<PolicyKey>().unwrap(),
            PolicyKey::LastUpdate
        );
        assert!("entropy".parse::<PolicyKey>().is_err());
    }

    #[test]
    fn test_round_trip_all_keys() {
        for key in PolicyKey::ALL {
            assert_eq!(key.as_str().parse::<PolicyKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_existing_account_only() {
        assert!(PolicyKey::Expiration.requires_existing_account());
        assert!(PolicyKey::LastUpdate.requires_existing_account());
        assert!(!PolicyKey::Size.requires_existing_account());
        assert!(!PolicyKey::CompromisedPassword.requires_existing_account());
    }
}
