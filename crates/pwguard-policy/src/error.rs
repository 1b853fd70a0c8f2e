//! Errors raised while turning policy definitions into a chain.

use pwguard_core::error::{AppError, ErrorKind};

/// Failure that aborts a reload and leaves the previous chain active.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// A definition names a policy key no check exists for.
    #[error("Unknown policy key '{0}'")]
    UnknownPolicyKey(String),

    /// The factory was assembled without a collaborator it needs.
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),

    /// The tenant names a password encoder that is not supported.
    #[error("Unsupported password encoder '{0}'")]
    UnsupportedEncoder(String),

    /// A store could not be read.
    #[error("Store unavailable: {0}")]
    Store(#[from] AppError),
}

impl From<PolicyError> for AppError {
    fn from(err: PolicyError) -> Self {
        match err {
            PolicyError::Store(inner) => inner,
            other => AppError::new(ErrorKind::Policy, other.to_string()),
        }
    }
}
