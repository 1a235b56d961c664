//! Age-based reclamation of upload and job records and their files.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use unpackd_core::config::RetentionConfig;
use unpackd_service::{JobStore, UploadStore};
use unpackd_storage::providers::LocalWorkspace;

/// Counts from one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Upload records discarded.
    pub uploads_removed: usize,
    /// Job records discarded.
    pub jobs_removed: usize,
    /// Driver tasks that were still running and had to be aborted.
    pub drivers_aborted: usize,
}

impl SweepReport {
    /// Whether the sweep reclaimed nothing.
    pub fn is_empty(&self) -> bool {
        self.uploads_removed == 0 && self.jobs_removed == 0
    }
}

/// Removes uploads and jobs older than their TTL.
#[derive(Debug)]
pub struct RetentionSweeper {
    /// Upload records
    uploads: UploadStore,
    /// Job records
    jobs: JobStore,
    /// On-disk layout
    workspace: Arc<LocalWorkspace>,
    /// Maximum upload age
    upload_ttl: Duration,
    /// Maximum job age
    job_ttl: Duration,
}

impl RetentionSweeper {
    /// Create a sweeper with explicit TTLs.
    pub fn new(
        uploads: UploadStore,
        jobs: JobStore,
        workspace: Arc<LocalWorkspace>,
        upload_ttl: Duration,
        job_ttl: Duration,
    ) -> Self {
        Self {
            uploads,
            jobs,
            workspace,
            upload_ttl,
            job_ttl,
        }
    }

    /// Create a sweeper with the configured TTLs.
    pub fn from_config(
        uploads: UploadStore,
        jobs: JobStore,
        workspace: Arc<LocalWorkspace>,
        config: &RetentionConfig,
    ) -> Self {
        Self::new(
            uploads,
            jobs,
            workspace,
            config.upload_ttl(),
            config.job_ttl(),
        )
    }

    /// Run one pass, treating `now` as the current time.
    ///
    /// File deletion failures are logged and do not keep a record alive.
    pub async fn sweep_once(&self, now: Instant) -> SweepReport {
        let mut report = SweepReport::default();
        self.sweep_uploads(now, &mut report).await;
        self.sweep_jobs(now, &mut report).await;
        report
    }

    async fn sweep_uploads(&self, now: Instant, report: &mut SweepReport) {
        for (id, handle) in self.uploads.snapshot() {
            let archive = {
                let mut record = handle.write().await;
                if record.is_reaped() || record.age(now) <= self.upload_ttl {
                    continue;
                }
                // Removed under the lock so a finalize or start queued behind
                // us sees the flag instead of acting on a detached record.
                self.uploads.remove(&id);
                record.mark_reaped();
                // A claimed archive belongs to its job from then on.
                record
                    .finalized()
                    .filter(|_| record.claimed_by().is_none())
                    .map(|a| a.path.clone())
            };

            if let Some(path) = archive {
                self.workspace.remove_file_quiet(&path).await;
            }
            report.uploads_removed += 1;
            tracing::debug!(upload_id = %id, "Expired upload removed");
        }
    }

    async fn sweep_jobs(&self, now: Instant, report: &mut SweepReport) {
        for (id, handle) in self.jobs.snapshot() {
            let (driver, archive, output_dir) = {
                let mut job = handle.write().await;
                if job.age(now) <= self.job_ttl {
                    continue;
                }
                self.jobs.remove(&id);
                (
                    job.take_driver(),
                    job.archive_path.clone(),
                    job.output_dir.clone(),
                )
            };

            if let Some(driver) = driver {
                if !driver.is_finished() {
                    driver.abort();
                    report.drivers_aborted += 1;
                    tracing::warn!(job_id = %id, "Aborted extraction that outlived its TTL");
                }
                // Wait for the task so its child process is gone before the
                // directory is removed.
                let _ = driver.await;
            }

            self.workspace.remove_file_quiet(&archive).await;
            self.workspace.remove_dir_quiet(&output_dir).await;
            report.jobs_removed += 1;
            tracing::debug!(job_id = %id, "Expired job removed");
        }
    }
}
