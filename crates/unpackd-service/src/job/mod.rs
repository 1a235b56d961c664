//! Extraction job lifecycle.

mod driver;
pub mod error;
pub mod manager;

pub use error::JobError;
pub use manager::{DownloadedFile, JobManager, JobStatusView};
