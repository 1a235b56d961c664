//! Extraction job model.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use unpackd_core::types::{JobId, UploadId};

use super::status::JobState;

/// One regular file produced by an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFile {
    /// File name relative to the job's output directory.
    pub name: String,
    /// Size in bytes.
    pub size: u64,
}

/// One decompression run.
///
/// State changes go through [`start_running`](Self::start_running),
/// [`complete`](Self::complete) and [`fail`](Self::fail), which refuse
/// illegal transitions, so the file list can only ever be set together with
/// the `Done` state.
#[derive(Debug)]
pub struct ExtractionJob {
    /// Job token.
    pub id: JobId,
    /// The upload whose archive this job consumes.
    pub upload_id: UploadId,
    /// Wall-clock creation time, for reporting.
    pub created_at: DateTime<Utc>,
    /// Monotonic creation time, used for expiry.
    pub born: Instant,
    /// Directory exclusively owned by this job.
    pub output_dir: PathBuf,
    /// Archive read by this job and deleted once it finishes.
    pub archive_path: PathBuf,
    state: JobState,
    files: Vec<ExtractedFile>,
    error: Option<String>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    driver: Option<JoinHandle<()>>,
}

impl ExtractionJob {
    /// Create a job in the `Queued` state.
    pub fn new(id: JobId, upload_id: UploadId, output_dir: PathBuf, archive_path: PathBuf) -> Self {
        Self {
            id,
            upload_id,
            created_at: Utc::now(),
            born: Instant::now(),
            output_dir,
            archive_path,
            state: JobState::Queued,
            files: Vec::new(),
            error: None,
            started_at: None,
            finished_at: None,
            driver: None,
        }
    }

    /// Current state.
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Extracted files. Always empty unless the job is `Done`.
    pub fn files(&self) -> &[ExtractedFile] {
        &self.files
    }

    /// Failure detail. Only present in `Failed`.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// When the driver moved the job to `Running`.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// When the job reached a terminal state.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// `Queued → Running`.
    pub fn start_running(&mut self) -> bool {
        if !self.state.can_transition_to(JobState::Running) {
            return false;
        }
        self.state = JobState::Running;
        self.started_at = Some(Utc::now());
        true
    }

    /// `Running → Done`, recording the extracted files.
    pub fn complete(&mut self, files: Vec<ExtractedFile>) -> bool {
        if !self.state.can_transition_to(JobState::Done) {
            return false;
        }
        self.state = JobState::Done;
        self.files = files;
        self.finished_at = Some(Utc::now());
        true
    }

    /// `Running → Failed`, recording the detail.
    pub fn fail(&mut self, detail: impl Into<String>) -> bool {
        if !self.state.can_transition_to(JobState::Failed) {
            return false;
        }
        self.state = JobState::Failed;
        self.error = Some(detail.into());
        self.finished_at = Some(Utc::now());
        true
    }

    /// Attach the handle of the task driving this job.
    pub fn attach_driver(&mut self, handle: JoinHandle<()>) {
        self.driver = Some(handle);
    }

    /// Whether a driver task is attached and still running.
    pub fn driver_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Detach the driver handle.
    pub fn take_driver(&mut self) -> Option<JoinHandle<()>> {
        self.driver.take()
    }

    /// Age of the record relative to `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.born)
    }
}
