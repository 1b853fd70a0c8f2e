//! Password policy entities.

pub mod definition;
pub mod key;

pub use definition::PolicyDefinition;
pub use key::PolicyKey;
