//! # pwguard-core
//!
//! Core crate for PwGuard. Contains configuration schemas, the clock
//! abstraction used by time-based policies, and the unified error system.
//!
//! This crate has **no** internal dependencies on other PwGuard crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
