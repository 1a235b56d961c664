//! # unpackd-entity
//!
//! In-memory domain records for unpackd. An [`upload::UploadRecord`] tracks
//! one chunked transfer; an [`job::ExtractionJob`] tracks one extraction run.
//! Records only enforce their own field invariants; protocol errors are
//! raised by the services that own them.

pub mod job;
pub mod upload;
