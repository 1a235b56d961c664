//! Retention sweeper configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Time-to-live thresholds for volatile records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Age after which an upload record and its archive are discarded.
    #[serde(default = "default_upload_ttl")]
    pub upload_ttl_seconds: u64,
    /// Age after which a job record and its output directory are discarded.
    #[serde(default = "default_job_ttl")]
    pub job_ttl_seconds: u64,
    /// Interval between sweeps.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            upload_ttl_seconds: default_upload_ttl(),
            job_ttl_seconds: default_job_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl RetentionConfig {
    /// Upload TTL as a [`Duration`].
    pub fn upload_ttl(&self) -> Duration {
        Duration::from_secs(self.upload_ttl_seconds)
    }

    /// Job TTL as a [`Duration`].
    pub fn job_ttl(&self) -> Duration {
        Duration::from_secs(self.job_ttl_seconds)
    }

    /// Sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

fn default_upload_ttl() -> u64 {
    60 * 60
}

fn default_job_ttl() -> u64 {
    6 * 60 * 60
}

fn default_sweep_interval() -> u64 {
    10 * 60
}
