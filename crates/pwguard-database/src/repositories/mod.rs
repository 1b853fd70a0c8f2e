//! Repository implementations for PwGuard entities.

pub mod account;
pub mod history;
pub mod policy;

pub use account::AccountSettingsRepository;
pub use history::PasswordHistoryRepository;
pub use policy::PolicyRepository;
