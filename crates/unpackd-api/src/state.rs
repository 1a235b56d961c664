//! Shared application state passed to all handlers via Axum's `State` extractor.

use std::sync::Arc;

use unpackd_core::config::AppConfig;
use unpackd_service::{JobManager, UploadService};

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Upload assembly.
    pub uploads: Arc<UploadService>,
    /// Extraction jobs.
    pub jobs: Arc<JobManager>,
}
