//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /upload/chunk`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChunkRequest {
    /// Upload token.
    #[validate(length(min = 1, message = "upload_id is required"))]
    pub upload_id: String,
    /// Zero-based chunk index.
    #[validate(range(min = 0, max = 4294967295_i64, message = "invalid index"))]
    pub index: i64,
    /// Base64 chunk text. A missing field is treated as an empty chunk.
    #[serde(default)]
    pub data: String,
    /// Chunk count, required on the first chunk.
    #[serde(default, rename = "totalChunks")]
    pub total_chunks: Option<i64>,
}

/// Body of `POST /upload/finish`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FinishRequest {
    /// Upload token.
    #[validate(length(min = 1, message = "upload_id is required"))]
    pub upload_id: String,
    /// Archive file name.
    #[validate(length(min = 1, message = "filename is required"))]
    pub filename: String,
    /// Declared decoded size in bytes.
    #[serde(default)]
    pub size: Option<u64>,
    /// Declared SHA-256 (hex).
    #[serde(default)]
    pub sha256: Option<String>,
}

/// Body of `POST /unzip/start`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StartJobRequest {
    /// Upload token of a finalized upload.
    #[validate(length(min = 1, message = "upload_id is required"))]
    pub upload_id: String,
    /// Archive password.
    #[serde(default)]
    pub password: Option<String>,
}

/// Query string of the `/unzip/*` GET endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobQuery {
    /// Job token.
    #[serde(default)]
    pub job_id: Option<String>,
    /// File name, for downloads.
    #[serde(default)]
    pub name: Option<String>,
}
