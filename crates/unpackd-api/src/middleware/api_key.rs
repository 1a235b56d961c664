//! API key authentication middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use subtle::ConstantTimeEq;

use unpackd_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Constant-time comparison of two strings.
fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Rejects requests that do not carry the configured API key.
///
/// An empty configured key means the server cannot authenticate anyone, which
/// is reported as a server error rather than a client one.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let auth = &state.config.auth;
    if !auth.is_configured() {
        tracing::error!("API key is not configured; refusing request");
        return ApiError(AppError::configuration(
            "server misconfigured: API key not set",
        ))
        .into_response();
    }

    let authorized = request
        .headers()
        .get(auth.header.as_str())
        .and_then(|v| v.to_str().ok())
        .is_some_and(|key| secure_compare(key, &auth.api_key));

    if !authorized {
        tracing::debug!(path = %request.uri().path(), "Rejected request without valid API key");
        return ApiError(AppError::unauthorized("unauthorized")).into_response();
    }

    next.run(request).await
}
