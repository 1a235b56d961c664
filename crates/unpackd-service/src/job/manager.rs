//! Job manager: creates extraction jobs and answers queries about them.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use unpackd_core::error::ErrorKind;
use unpackd_core::traits::Extractor;
use unpackd_core::types::{JobId, UploadId};
use unpackd_entity::job::{ExtractedFile, ExtractionJob, JobState};
use unpackd_storage::providers::LocalWorkspace;

use crate::{JobStore, UploadStore};

use super::driver::JobDriver;
use super::error::JobError;

/// Snapshot of a job's progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusView {
    /// Current state.
    pub state: JobState,
    /// Failure detail, only set in `Failed`.
    pub error: Option<String>,
}

/// One file read back from a finished job.
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// File name.
    pub name: String,
    /// Raw contents.
    pub data: Bytes,
}

/// Owns extraction jobs and their driver tasks.
#[derive(Clone)]
pub struct JobManager {
    uploads: UploadStore,
    jobs: JobStore,
    workspace: Arc<LocalWorkspace>,
    extractor: Arc<dyn Extractor>,
}

impl std::fmt::Debug for JobManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobManager")
            .field("jobs", &self.jobs.len())
            .field("extractor", &self.extractor.name())
            .finish()
    }
}

impl JobManager {
    /// Creates a new job manager.
    pub fn new(
        uploads: UploadStore,
        jobs: JobStore,
        workspace: Arc<LocalWorkspace>,
        extractor: Arc<dyn Extractor>,
    ) -> Self {
        Self {
            uploads,
            jobs,
            workspace,
            extractor,
        }
    }

    /// Create a job for a finalized upload and spawn its driver.
    ///
    /// Returns as soon as the job is recorded as `Queued`. Each archive can
    /// be consumed by one job only.
    pub async fn start(
        &self,
        upload_id: UploadId,
        password: Option<String>,
    ) -> Result<JobId, JobError> {
        let upload = self.uploads.get(&upload_id).ok_or(JobError::InvalidToken)?;
        let mut upload = upload.write().await;

        if upload.is_reaped() {
            return Err(JobError::InvalidToken);
        }
        if !upload.is_finalized() {
            return Err(JobError::UploadNotReady("upload not finalized"));
        }
        if upload.claimed_by().is_some() {
            return Err(JobError::UploadNotReady("archive already consumed"));
        }

        let job_id = JobId::new();
        let output_dir = self
            .workspace
            .create_job_dir(job_id)
            .await
            .map_err(JobError::Storage)?;
        let Some(archive) = upload.claim(job_id) else {
            self.workspace.remove_dir_quiet(&output_dir).await;
            return Err(JobError::UploadNotReady("archive already consumed"));
        };
        drop(upload);

        let job = self.jobs.insert(
            job_id,
            ExtractionJob::new(job_id, upload_id, output_dir.clone(), archive.clone()),
        );

        // Hold the record while spawning so the handle is attached before the
        // driver can observe the job.
        let mut guard = job.write().await;
        let driver = JobDriver {
            job_id,
            job: Arc::clone(&job),
            extractor: Arc::clone(&self.extractor),
            workspace: Arc::clone(&self.workspace),
            archive,
            output_dir,
            password: password.filter(|p| !p.is_empty()),
        };
        guard.attach_driver(tokio::spawn(driver.run()));
        drop(guard);

        info!(job_id = %job_id, upload_id = %upload_id, "Extraction job queued");
        Ok(job_id)
    }

    /// Current state and failure detail of a job.
    pub async fn status(&self, job_id: JobId) -> Result<JobStatusView, JobError> {
        let job = self.jobs.get(&job_id).ok_or(JobError::JobNotFound)?;
        let job = job.read().await;
        Ok(JobStatusView {
            state: job.state(),
            error: job.error().map(str::to_owned),
        })
    }

    /// Files produced by a finished job.
    pub async fn list_files(&self, job_id: JobId) -> Result<Vec<ExtractedFile>, JobError> {
        let job = self.jobs.get(&job_id).ok_or(JobError::JobNotFound)?;
        let job = job.read().await;
        match job.state() {
            JobState::Done => Ok(job.files().to_vec()),
            state => Err(JobError::NotReady { state }),
        }
    }

    /// Read one file from a finished job's output directory.
    pub async fn download_file(
        &self,
        job_id: JobId,
        name: &str,
    ) -> Result<DownloadedFile, JobError> {
        let job = self.jobs.get(&job_id).ok_or(JobError::JobNotFound)?;
        let output_dir = {
            let job = job.read().await;
            if job.state() != JobState::Done {
                return Err(JobError::NotReady { state: job.state() });
            }
            job.output_dir.clone()
        };

        if name.is_empty() {
            return Err(JobError::NameRequired);
        }

        let data = self
            .workspace
            .read_entry(&output_dir, name)
            .await
            .map_err(|e| {
                if e.kind != ErrorKind::NotFound {
                    debug!(job_id = %job_id, name, error = %e, "Download failed");
                }
                JobError::FileNotFound
            })?;

        Ok(DownloadedFile {
            name: name.to_string(),
            data,
        })
    }

    /// Number of live job records.
    pub fn count(&self) -> usize {
        self.jobs.len()
    }
}
