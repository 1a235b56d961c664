//! Route definitions for the unpackd HTTP API.
//!
//! Upload and extraction routes sit behind the API key check. `/healthz`
//! stays open so load balancers can probe it.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;

    let protected = Router::new()
        .merge(upload_routes())
        .merge(unzip_routes())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::api_key::require_api_key,
        ));

    Router::new()
        .merge(protected)
        .merge(health_routes())
        .layer(DefaultBodyLimit::max(max_body))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Chunked upload: init, chunk, finish
fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/upload/init", post(handlers::upload::init))
        .route("/upload/chunk", post(handlers::upload::chunk))
        .route("/upload/finish", post(handlers::upload::finish))
}

/// Extraction jobs and their output
fn unzip_routes() -> Router<AppState> {
    Router::new()
        .route("/unzip/start", post(handlers::unzip::start))
        .route("/unzip/status", get(handlers::unzip::status))
        .route("/unzip/files", get(handlers::unzip::files))
        .route("/unzip/download", get(handlers::unzip::download))
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/healthz", get(handlers::health::health))
}
