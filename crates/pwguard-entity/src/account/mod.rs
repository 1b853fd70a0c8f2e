//! Account-level settings.

pub mod settings;

pub use settings::AccountSettings;
