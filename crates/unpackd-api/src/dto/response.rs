//! Response DTOs.

use serde::{Deserialize, Serialize};

use unpackd_entity::job::ExtractedFile;

/// `POST /upload/init`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitUploadResponse {
    /// New upload token.
    pub upload_id: String,
}

/// `POST /upload/chunk`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkResponse {
    /// Always true.
    pub ok: bool,
    /// Stored index.
    pub index: u32,
    /// Length of the stored chunk text.
    pub len: usize,
    /// Distinct chunks received so far.
    #[serde(rename = "receivedCount")]
    pub received_count: u32,
}

/// `POST /upload/finish`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinishResponse {
    /// Always true.
    pub ok: bool,
    /// Decoded archive size.
    pub size: u64,
    /// SHA-256 of the archive (lowercase hex).
    pub sha256: String,
}

/// `POST /unzip/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartJobResponse {
    /// New job token.
    pub job_id: String,
}

/// `GET /unzip/status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// `queued`, `running`, `done` or `error`.
    pub status: String,
    /// Failure detail, `null` unless the job failed.
    pub error: Option<String>,
}

/// `GET /unzip/files`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFilesResponse {
    /// Extracted files sorted by name.
    pub files: Vec<ExtractedFile>,
}

/// `GET /unzip/download`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// File name.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// Base64 file contents.
    pub data: String,
}

/// `GET /healthz`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always true.
    pub ok: bool,
    /// Server version.
    pub version: String,
    /// Live upload records.
    pub uploads: usize,
    /// Live job records.
    pub jobs: usize,
}
