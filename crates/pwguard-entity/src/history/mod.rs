//! Password history entities.

pub mod model;

pub use model::{PasswordHistoryEntry, StoredCredential};
