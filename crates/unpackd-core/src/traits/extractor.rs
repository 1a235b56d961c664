//! Archive extraction tool abstraction.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by an [`Extractor`].
///
/// The `Display` output becomes the detail string of a failed job, so it
/// carries the tool's diagnostic text verbatim.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The tool could not be started at all.
    #[error("failed to launch extractor '{command}': {source}")]
    Launch {
        /// The command that was attempted.
        command: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and reported failure.
    #[error("extractor failed: code={code}, stderr={stderr}")]
    Failed {
        /// Exit code, or `-1` if the process was killed by a signal.
        code: i32,
        /// Captured standard error, possibly truncated.
        stderr: String,
    },

    /// Preparing the extraction environment failed.
    #[error("extractor I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Parameters for a single extraction run.
#[derive(Debug, Clone, Copy)]
pub struct ExtractRequest<'a> {
    /// The archive to unpack.
    pub archive: &'a Path,
    /// Directory the entries are written into.
    pub output_dir: &'a Path,
    /// Optional archive password.
    pub password: Option<&'a str>,
}

/// Unpacks an archive into a directory.
///
/// On success the extracted regular files sit directly in the output
/// directory. Implementations must not return before the tool has exited.
#[async_trait]
pub trait Extractor: Send + Sync + std::fmt::Debug + 'static {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Run the extraction to completion.
    async fn extract(&self, request: ExtractRequest<'_>) -> Result<(), ExtractError>;
}
