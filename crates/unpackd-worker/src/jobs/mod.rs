//! Periodic maintenance job implementations.

pub mod retention;

pub use retention::{RetentionSweeper, SweepReport};
