//! Extraction job errors.

use serde_json::json;
use thiserror::Error;

use unpackd_core::error::AppError;
use unpackd_entity::job::JobState;

/// Errors returned by [`JobManager`](super::JobManager) operations.
#[derive(Debug, Error)]
pub enum JobError {
    /// The upload token is unknown or malformed.
    #[error("invalid upload_id")]
    InvalidToken,

    /// The upload has no archive available to extract.
    #[error("upload not ready: {0}")]
    UploadNotReady(&'static str),

    /// The job token is unknown or malformed.
    #[error("job not found")]
    JobNotFound,

    /// The job has not finished successfully.
    #[error("job is not ready (status={state})")]
    NotReady {
        /// State the job was in.
        state: JobState,
    },

    /// No file name was given.
    #[error("name is required")]
    NameRequired,

    /// The requested file does not exist in the job output.
    #[error("file not found")]
    FileNotFound,

    /// The job's working directory could not be prepared.
    #[error("failed to prepare job: {0}")]
    Storage(#[source] AppError),
}

impl From<JobError> for AppError {
    fn from(err: JobError) -> Self {
        let message = err.to_string();
        match err {
            JobError::InvalidToken => AppError::validation(message)
                .with_details(json!({ "reason": "invalid_token" })),
            JobError::UploadNotReady(_) => AppError::validation(message)
                .with_details(json!({ "reason": "upload_not_ready" })),
            JobError::JobNotFound => AppError::not_found(message)
                .with_details(json!({ "reason": "job_not_found" })),
            JobError::NotReady { state } => AppError::conflict(message)
                .with_details(json!({ "reason": "not_ready", "status": state })),
            JobError::NameRequired => AppError::validation(message)
                .with_details(json!({ "reason": "name_required" })),
            JobError::FileNotFound => AppError::not_found(message)
                .with_details(json!({ "reason": "file_not_found" })),
            JobError::Storage(inner) => inner,
        }
    }
}
