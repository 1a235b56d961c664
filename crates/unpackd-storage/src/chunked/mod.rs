//! Chunked upload reassembly.

pub mod assembler;

pub use assembler::{AssembledPayload, AssemblyError, ChunkAssembler, Expectations, sha256_hex};
