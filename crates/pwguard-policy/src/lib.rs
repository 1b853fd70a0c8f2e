//! # pwguard-policy
//!
//! The password policy validation engine.
//!
//! ## Modules
//!
//! - `checks`: the seven policy checks behind a single `evaluate` entry point
//! - `factory`: builds checks from stored policy definitions
//! - `engine`: holds the active chain, validates, and reloads atomically
//! - `poller`: periodic staleness detection that triggers reloads
//! - `breach`: k-anonymity breach-lookup client
//! - `encoder`: password encoders used for history comparison
//! - `store`: collaborator traits plus in-memory and PostgreSQL adapters

pub mod breach;
pub mod checks;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod factory;
pub mod poller;
pub mod rules;
pub mod store;
pub mod validation;

pub use breach::{BreachLookup, BreachLookupError, HttpBreachClient};
pub use checks::PolicyCheck;
pub use encoder::PasswordEncoder;
pub use engine::{ChainSnapshot, ValidationEngine, ValidationEngineBuilder};
pub use error::PolicyError;
pub use factory::{CheckDependencies, CheckFactory};
pub use poller::StalenessPoller;
pub use store::{PasswordHistoryStore, PolicyStore, TenantSettingsProvider};
pub use validation::{ValidationInput, ValidationMode, ValidationResult};
