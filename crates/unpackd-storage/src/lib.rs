//! # unpackd-storage
//!
//! Storage building blocks for unpackd: the in-memory record store, the
//! chunk assembler that turns base64 chunks back into verified bytes, and the
//! local scratch directory that holds archives and extraction output.

pub mod chunked;
pub mod memory;
pub mod providers;

pub use chunked::ChunkAssembler;
pub use memory::MemoryStore;
pub use providers::LocalWorkspace;
