//! # unpackd-core
//!
//! Core crate for unpackd. Contains the configuration schema, typed
//! identifiers, the record store and extractor traits, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other unpackd crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
