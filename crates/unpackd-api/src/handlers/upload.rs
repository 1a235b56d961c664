//! Upload handlers: init, chunk, finish.

use axum::Json;
use axum::extract::State;

use unpackd_core::types::UploadId;
use unpackd_service::{FinalizeParams, UploadError};

use crate::dto::request::{ChunkRequest, FinishRequest};
use crate::dto::response::{ChunkResponse, FinishResponse, InitUploadResponse};
use crate::error::ApiError;
use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Parses an upload token.
pub(crate) fn parse_upload_id(raw: &str) -> Result<UploadId, UploadError> {
    raw.trim().parse().map_err(|_| UploadError::InvalidToken)
}

/// POST /upload/init
pub async fn init(State(state): State<AppState>) -> Json<InitUploadResponse> {
    let id = state.uploads.create();
    Json(InitUploadResponse {
        upload_id: id.to_string(),
    })
}

/// POST /upload/chunk
pub async fn chunk(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ChunkRequest>,
) -> Result<Json<ChunkResponse>, ApiError> {
    let id = parse_upload_id(&req.upload_id)?;
    // Range-checked by the DTO.
    let index = u32::try_from(req.index).unwrap_or(u32::MAX);
    // A negative or oversized declaration counts as missing.
    let declared_total = req.total_chunks.and_then(|t| u32::try_from(t).ok());

    let ack = state
        .uploads
        .put_chunk(id, index, req.data, declared_total)
        .await?;

    Ok(Json(ChunkResponse {
        ok: true,
        index: ack.index,
        len: ack.len,
        received_count: ack.received_count,
    }))
}

/// POST /upload/finish
pub async fn finish(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<FinishRequest>,
) -> Result<Json<FinishResponse>, ApiError> {
    let id = parse_upload_id(&req.upload_id)?;
    let archive = state
        .uploads
        .finalize(
            id,
            FinalizeParams {
                filename: req.filename,
                size: req.size,
                sha256: req.sha256,
            },
        )
        .await?;

    Ok(Json(FinishResponse {
        ok: true,
        size: archive.size,
        sha256: archive.sha256,
    }))
}
