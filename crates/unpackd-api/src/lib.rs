//! # unpackd-api
//!
//! HTTP API layer for unpackd built on Axum.
//!
//! Provides the upload and unzip endpoints, the health probe, API key and
//! request logging middleware, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{Application, bootstrap, build_app};
pub use error::ApiError;
pub use state::AppState;
