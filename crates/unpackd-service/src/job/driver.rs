//! Background task that carries one job from `Queued` to a terminal state.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};

use unpackd_core::traits::extractor::{ExtractRequest, Extractor};
use unpackd_core::traits::store::SharedRecord;
use unpackd_core::types::JobId;
use unpackd_entity::job::ExtractionJob;
use unpackd_storage::providers::LocalWorkspace;

/// Everything the driver needs, owned so it can move into `tokio::spawn`.
pub(super) struct JobDriver {
    pub(super) job_id: JobId,
    pub(super) job: SharedRecord<ExtractionJob>,
    pub(super) extractor: Arc<dyn Extractor>,
    pub(super) workspace: Arc<LocalWorkspace>,
    pub(super) archive: PathBuf,
    pub(super) output_dir: PathBuf,
    pub(super) password: Option<String>,
}

impl JobDriver {
    /// Run the extraction and record its outcome. The archive is deleted
    /// before the terminal state is recorded, whatever the outcome.
    pub(super) async fn run(self) {
        if !self.job.write().await.start_running() {
            warn!(job_id = %self.job_id, "Job was not queued, driver exiting");
            return;
        }
        info!(
            job_id = %self.job_id,
            extractor = self.extractor.name(),
            "Extraction started"
        );

        let request = ExtractRequest {
            archive: &self.archive,
            output_dir: &self.output_dir,
            password: self.password.as_deref(),
        };
        let outcome = match self.extractor.extract(request).await {
            Ok(()) => self
                .workspace
                .list_regular_files(&self.output_dir)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        self.workspace.remove_file_quiet(&self.archive).await;

        let mut job = self.job.write().await;
        match outcome {
            Ok(files) => {
                let count = files.len();
                job.complete(files);
                info!(
                    job_id = %self.job_id,
                    files = count,
                    elapsed_ms = run_millis(&job),
                    "Extraction finished"
                );
            }
            Err(detail) => {
                job.fail(detail);
                warn!(
                    job_id = %self.job_id,
                    error = job.error().unwrap_or_default(),
                    elapsed_ms = run_millis(&job),
                    "Extraction failed"
                );
            }
        }
    }
}

/// Milliseconds between `Running` and the terminal state, or -1 if either
/// timestamp is missing.
fn run_millis(job: &ExtractionJob) -> i64 {
    job.started_at()
        .zip(job.finished_at())
        .map_or(-1, |(started, finished)| (finished - started).num_milliseconds())
}
