//! Background maintenance for unpackd.
//!
//! This crate provides:
//! - A retention sweeper that reclaims expired uploads and jobs
//! - A runner that drives the sweeper on a fixed interval until shutdown

pub mod jobs;
pub mod runner;

pub use jobs::{RetentionSweeper, SweepReport};
pub use runner::SweepRunner;
