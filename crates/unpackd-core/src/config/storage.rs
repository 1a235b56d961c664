//! Working directory configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default cap on the chunk count a single upload may declare.
pub const DEFAULT_MAX_CHUNKS: u32 = 100_000;

/// Layout of the scratch directory holding archives and extraction output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_tmp_dir")]
    pub tmp_dir: String,
    /// Largest `totalChunks` a client may declare. Bounds the per-upload
    /// bookkeeping, including the missing-chunk report.
    #[serde(default = "default_max_chunks")]
    pub max_chunks: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tmp_dir: default_tmp_dir(),
            max_chunks: default_max_chunks(),
        }
    }
}

impl StorageConfig {
    /// Directory holding reassembled archives.
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(&self.tmp_dir).join("uploads")
    }

    /// Directory holding one output directory per extraction job.
    pub fn jobs_dir(&self) -> PathBuf {
        PathBuf::from(&self.tmp_dir).join("jobs")
    }

    /// Directory the extraction tool is staged into.
    pub fn bin_dir(&self) -> PathBuf {
        PathBuf::from(&self.tmp_dir).join("bin")
    }
}

fn default_tmp_dir() -> String {
    "./tmp".to_string()
}

fn default_max_chunks() -> u32 {
    DEFAULT_MAX_CHUNKS
}
