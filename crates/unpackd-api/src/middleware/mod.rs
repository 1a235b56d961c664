//! Axum middleware stack.

pub mod api_key;
pub mod cors;
pub mod logging;
