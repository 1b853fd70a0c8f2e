//! Password encoders used to compare a candidate against stored history.

use std::fmt;
use std::str::FromStr;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use sha2::{Digest, Sha256};
use tracing::debug;

use pwguard_core::error::AppError;
use pwguard_entity::history::StoredCredential;

use crate::error::PolicyError;

/// The encoder a tenant stores passwords with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordEncoder {
    /// Argon2id PHC strings; the salt is embedded in the hash.
    Argon2,
    /// Hex SHA-256 of `salt || password`, salt stored alongside.
    Sha256,
}

impl PasswordEncoder {
    /// The identifier used in tenant settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argon2 => "argon2",
            Self::Sha256 => "sha256",
        }
    }

    /// Encode a password with a fresh random salt.
    pub fn encode(&self, password: &str) -> Result<StoredCredential, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        match self {
            Self::Argon2 => {
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
                Ok(StoredCredential {
                    salt: String::new(),
                    hash: hash.to_string(),
                })
            }
            Self::Sha256 => {
                let salt = salt.as_str().to_string();
                let hash = salted_sha256(&salt, password);
                Ok(StoredCredential { salt, hash })
            }
        }
    }

    /// Whether `password` encodes to the stored credential.
    ///
    /// A stored value this encoder cannot parse never matches.
    pub fn matches(&self, password: &str, stored: &StoredCredential) -> bool {
        match self {
            Self::Argon2 => {
                let parsed = match PasswordHash::new(&stored.hash) {
                    Ok(parsed) => parsed,
                    Err(e) => {
                        debug!(error = %e, "Skipping unparsable Argon2 history entry");
                        return false;
                    }
                };
                Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok()
            }
            Self::Sha256 => salted_sha256(&stored.salt, password).eq_ignore_ascii_case(&stored.hash),
        }
    }
}

impl fmt::Display for PasswordEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PasswordEncoder {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "argon2" | "argon2id" => Ok(Self::Argon2),
            "sha256" | "sha-256" => Ok(Self::Sha256),
            _ => Err(PolicyError::UnsupportedEncoder(s.to_string())),
        }
    }
}

fn salted_sha256(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
