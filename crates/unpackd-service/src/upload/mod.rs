//! Chunked upload assembly.

pub mod error;
pub mod service;

pub use error::UploadError;
pub use service::{ChunkAck, FinalizeParams, UploadService};
