//! Application builder: wires services, state, and router together.

use std::sync::Arc;

use axum::Router;

use unpackd_core::config::AppConfig;
use unpackd_core::{AppError, AppResult};
use unpackd_core::traits::Extractor;
use unpackd_service::{CommandExtractor, JobManager, JobStore, UploadService, UploadStore};
use unpackd_storage::{LocalWorkspace, MemoryStore};
use unpackd_worker::RetentionSweeper;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Everything the binary needs to serve and maintain the service.
#[derive(Debug, Clone)]
pub struct Application {
    /// Handler state.
    pub state: AppState,
    /// Reclaims expired uploads and jobs.
    pub sweeper: Arc<RetentionSweeper>,
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = state.config.server.cors.clone();
    let header = state.config.auth.header.clone();
    let router = build_router(state);
    if cors.enabled {
        router.layer(build_cors_layer(&cors, &header))
    } else {
        router
    }
}

/// Construct the services described by `config`, using the configured
/// command-line extractor.
pub async fn bootstrap(config: AppConfig) -> AppResult<Application> {
    let extractor = if config.extractor.stage_binary {
        CommandExtractor::staged(&config.extractor, &config.storage.bin_dir())
            .await
            .map_err(|e| {
                AppError::external_service(format!("failed to stage extractor: {e}"))
            })?
    } else {
        CommandExtractor::new(&config.extractor)
    };
    tracing::info!(
        program = %extractor.program().display(),
        staged = config.extractor.stage_binary,
        "Extractor configured"
    );
    let extractor: Arc<dyn Extractor> = Arc::new(extractor);
    bootstrap_with_extractor(config, extractor).await
}

/// Construct the services described by `config` around a given extractor.
pub async fn bootstrap_with_extractor(
    config: AppConfig,
    extractor: Arc<dyn Extractor>,
) -> AppResult<Application> {
    let workspace = Arc::new(LocalWorkspace::new(&config.storage).await?);
    tracing::info!(
        uploads = %workspace.uploads_dir().display(),
        jobs = %workspace.jobs_dir().display(),
        extractor = extractor.name(),
        "Workspace ready"
    );

    let upload_store: UploadStore = Arc::new(MemoryStore::new());
    let job_store: JobStore = Arc::new(MemoryStore::new());

    let uploads = Arc::new(
        UploadService::new(Arc::clone(&upload_store), Arc::clone(&workspace))
            .with_max_chunks(config.storage.max_chunks),
    );
    let jobs = Arc::new(JobManager::new(
        Arc::clone(&upload_store),
        Arc::clone(&job_store),
        Arc::clone(&workspace),
        extractor,
    ));
    let sweeper = Arc::new(RetentionSweeper::from_config(
        upload_store,
        job_store,
        workspace,
        &config.retention,
    ));

    if !config.auth.is_configured() {
        tracing::warn!("No API key configured; protected routes will answer 500");
    }

    Ok(Application {
        state: AppState {
            config: Arc::new(config),
            uploads,
            jobs,
        },
        sweeper,
    })
}
