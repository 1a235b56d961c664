//! Unzip handlers: start, status, files, download.

use axum::Json;
use axum::extract::{Query, State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use unpackd_core::types::JobId;
use unpackd_service::JobError;

use crate::dto::request::{JobQuery, StartJobRequest};
use crate::dto::response::{
    DownloadResponse, JobFilesResponse, JobStatusResponse, StartJobResponse,
};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::handlers::upload::parse_upload_id;
use crate::state::AppState;

/// Missing and malformed job tokens both mean the job does not exist.
fn parse_job_id(raw: Option<&str>) -> Result<JobId, JobError> {
    raw.and_then(|s| s.trim().parse().ok())
        .ok_or(JobError::JobNotFound)
}

/// POST /unzip/start
pub async fn start(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<StartJobRequest>,
) -> Result<Json<StartJobResponse>, ApiError> {
    let upload_id = parse_upload_id(&req.upload_id).map_err(|_| JobError::InvalidToken)?;
    let job_id = state.jobs.start(upload_id, req.password).await?;
    Ok(Json(StartJobResponse {
        job_id: job_id.to_string(),
    }))
}

/// GET /unzip/status
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<JobStatusResponse>, ApiError> {
    let job_id = parse_job_id(query.job_id.as_deref())?;
    let view = state.jobs.status(job_id).await?;
    Ok(Json(JobStatusResponse {
        status: view.state.as_str().to_string(),
        error: view.error,
    }))
}

/// GET /unzip/files
pub async fn files(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<JobFilesResponse>, ApiError> {
    let job_id = parse_job_id(query.job_id.as_deref())?;
    let files = state.jobs.list_files(job_id).await?;
    Ok(Json(JobFilesResponse { files }))
}

/// GET /unzip/download
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<JobQuery>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let job_id = parse_job_id(query.job_id.as_deref())?;
    let name = query.name.unwrap_or_default();
    let file = state.jobs.download_file(job_id, &name).await?;
    Ok(Json(DownloadResponse {
        size: file.data.len() as u64,
        data: STANDARD.encode(&file.data),
        name: file.name,
    }))
}
