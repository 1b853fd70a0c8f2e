//! The policy checks.
//!
//! Every check binds its configuration when it is built and keeps no state
//! between calls; the verdict and message travel back in the returned
//! [`ValidationResult`].

pub mod complexity;
pub mod compromised;
pub mod cooldown;
pub mod expiration;
pub mod size;
pub mod special;
pub mod username;

use pwguard_entity::policy::PolicyKey;

use crate::validation::{ValidationInput, ValidationResult};

pub use complexity::ComplexityCheck;
pub use compromised::CompromisedPasswordCheck;
pub use cooldown::CooldownCheck;
pub use expiration::ExpirationCheck;
pub use size::SizeCheck;
pub use special::SpecialCharactersCheck;
pub use username::UsernameExclusionCheck;

/// One configured check in the active chain.
#[derive(Debug)]
pub enum PolicyCheck {
    /// Length bounds.
    Size(SizeCheck),
    /// Character-class minimums.
    Complexity(ComplexityCheck),
    /// Special-character minimum.
    SpecialCharacters(SpecialCharactersCheck),
    /// Breach-database lookup.
    CompromisedPassword(CompromisedPasswordCheck),
    /// Username fragments.
    UsernameExclusion(UsernameExclusionCheck),
    /// Password age and reuse.
    Expiration(ExpirationCheck),
    /// Minimum time between changes.
    Cooldown(CooldownCheck),
}

impl PolicyCheck {
    /// The policy key this check was built from.
    pub fn key(&self) -> PolicyKey {
        match self {
            Self::Size(_) => PolicyKey::Size,
            Self::Complexity(_) => PolicyKey::Complexity,
            Self::SpecialCharacters(_) => PolicyKey::SpecialCharacters,
            Self::CompromisedPassword(_) => PolicyKey::CompromisedPassword,
            Self::UsernameExclusion(_) => PolicyKey::UsernameExclusion,
            Self::Expiration(_) => PolicyKey::Expiration,
            Self::Cooldown(_) => PolicyKey::LastUpdate,
        }
    }

    /// Evaluate the check against one input.
    pub async fn evaluate(&self, input: &ValidationInput<'_>) -> ValidationResult {
        match self {
            Self::Size(check) => check.evaluate(input),
            Self::Complexity(check) => check.evaluate(input),
            Self::SpecialCharacters(check) => check.evaluate(input),
            Self::CompromisedPassword(check) => check.evaluate(input).await,
            Self::UsernameExclusion(check) => check.evaluate(input),
            Self::Expiration(check) => check.evaluate(input).await,
            Self::Cooldown(check) => check.evaluate(input),
        }
    }
}
