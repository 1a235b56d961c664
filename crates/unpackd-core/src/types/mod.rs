//! Core type definitions used across the unpackd workspace.

pub mod id;

pub use id::*;
