//! Upload protocol errors.

use serde_json::json;
use thiserror::Error;

use unpackd_core::error::AppError;
use unpackd_storage::chunked::AssemblyError;

/// Everything that can go wrong while pushing chunks or finalizing.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The upload token is unknown or malformed.
    #[error("invalid upload_id")]
    InvalidToken,

    /// The first chunk did not declare a positive chunk count.
    #[error("totalChunks is required on the first chunk and must be positive")]
    TotalChunksRequired,

    /// The first chunk declared more chunks than the server accepts.
    #[error("totalChunks {declared} exceeds the limit of {limit}")]
    TooManyChunks {
        /// Declared chunk count.
        declared: u32,
        /// Configured maximum.
        limit: u32,
    },

    /// Finalize was called before any chunk was accepted.
    #[error("no chunks have been received for this upload")]
    NothingReceived,

    /// The chunk index does not fit the declared chunk count.
    #[error("chunk index {index} is out of range (totalChunks={total})")]
    IndexOutOfRange {
        /// Offending index.
        index: u32,
        /// Latched chunk count.
        total: u32,
    },

    /// The chunk carried no data.
    #[error("chunk {index} is empty")]
    EmptyChunk {
        /// Offending index.
        index: u32,
    },

    /// Finalize found absent slots.
    #[error("missing {} of {expected} chunks", missing.len())]
    MissingChunks {
        /// Absent indices, ascending.
        missing: Vec<u32>,
        /// Distinct chunks received.
        received: u32,
        /// Declared chunk count.
        expected: u32,
    },

    /// The reassembled payload failed decoding or verification.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// The upload was already finalized.
    #[error("upload is already finalized")]
    AlreadyFinalized,

    /// Writing the archive failed.
    #[error("failed to store archive: {0}")]
    Storage(#[source] AppError),
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        let message = err.to_string();
        match err {
            UploadError::InvalidToken => AppError::validation(message)
                .with_details(json!({ "reason": "invalid_token" })),
            UploadError::TotalChunksRequired => AppError::validation(message)
                .with_details(json!({ "reason": "protocol_violation" })),
            UploadError::TooManyChunks { declared, limit } => AppError::validation(message)
                .with_details(json!({
                    "reason": "protocol_violation",
                    "totalChunks": declared,
                    "limit": limit,
                })),
            UploadError::NothingReceived => AppError::conflict(message)
                .with_details(json!({ "reason": "protocol_violation" })),
            UploadError::IndexOutOfRange { index, total } => AppError::validation(message)
                .with_details(json!({
                    "reason": "index_out_of_range",
                    "index": index,
                    "totalChunks": total,
                })),
            UploadError::EmptyChunk { index } => AppError::validation(message)
                .with_details(json!({ "reason": "empty_chunk", "index": index })),
            UploadError::MissingChunks {
                missing,
                received,
                expected,
            } => AppError::integrity(message).with_details(json!({
                "reason": "missing_chunks",
                "missing": missing,
                "received": received,
                "expected": expected,
            })),
            UploadError::Assembly(inner) => {
                let details = match &inner {
                    AssemblyError::InvalidEncoding(_) => {
                        json!({ "reason": "invalid_encoding" })
                    }
                    AssemblyError::SizeMismatch { expected, actual } => json!({
                        "reason": "size_mismatch",
                        "expected": expected,
                        "actual": actual,
                    }),
                    AssemblyError::DigestMismatch { expected, actual } => json!({
                        "reason": "digest_mismatch",
                        "expected": expected,
                        "actual": actual,
                    }),
                };
                AppError::integrity(message).with_details(details)
            }
            UploadError::AlreadyFinalized => AppError::conflict(message)
                .with_details(json!({ "reason": "already_finalized" })),
            UploadError::Storage(inner) => inner,
        }
    }
}
