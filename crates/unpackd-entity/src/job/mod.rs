//! Extraction job records.

pub mod model;
pub mod status;

pub use model::{ExtractedFile, ExtractionJob};
pub use status::JobState;
