//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use unpackd_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
///
/// `api_key_header` is always allowed so browsers can authenticate.
pub fn build_cors_layer(config: &CorsConfig, api_key_header: &str) -> CorsLayer {
    let mut layer = CorsLayer::new().allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    if config.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any).allow_headers(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        let mut headers = vec![axum::http::header::CONTENT_TYPE];
        if let Ok(name) = HeaderName::try_from(api_key_header) {
            headers.push(name);
        }
        layer = layer.allow_origin(origins).allow_headers(headers);
    }

    layer.max_age(Duration::from_secs(config.max_age_seconds))
}
