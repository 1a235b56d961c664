//! Core traits defined in `unpackd-core` and implemented by other crates.

pub mod extractor;
pub mod store;

pub use extractor::{ExtractError, ExtractRequest, Extractor};
pub use store::{RecordStore, SharedRecord};
