//! Chunked upload records.

pub mod model;

pub use model::{FinalizedArchive, UploadRecord};
