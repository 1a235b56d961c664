//! In-memory record store.

pub mod store;

pub use store::MemoryStore;
