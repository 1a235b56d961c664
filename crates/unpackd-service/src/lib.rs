//! # unpackd-service
//!
//! Use cases for unpackd: reassembling chunked uploads, running extraction
//! jobs against an [`Extractor`](unpackd_core::traits::Extractor), and the
//! command-line extractor used in production.
//!
//! Services receive their record stores and workspace at construction time
//! via `Arc` references.

pub mod extractor;
pub mod job;
pub mod upload;

use std::sync::Arc;

use unpackd_core::traits::RecordStore;
use unpackd_core::types::{JobId, UploadId};
use unpackd_entity::job::ExtractionJob;
use unpackd_entity::upload::UploadRecord;

pub use extractor::CommandExtractor;
pub use job::{DownloadedFile, JobError, JobManager, JobStatusView};
pub use upload::{ChunkAck, FinalizeParams, UploadError, UploadService};

/// Shared store of upload records.
pub type UploadStore = Arc<dyn RecordStore<UploadId, UploadRecord>>;

/// Shared store of extraction jobs.
pub type JobStore = Arc<dyn RecordStore<JobId, ExtractionJob>>;
