//! Core type definitions used across the PwGuard workspace.

pub mod clock;

pub use clock::{Clock, ManualClock, SystemClock};
