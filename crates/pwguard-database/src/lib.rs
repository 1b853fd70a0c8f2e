//! # pwguard-database
//!
//! PostgreSQL connection management and repositories for the tables the
//! policy engine reads: policy definitions, password history, and
//! account settings.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
