//! Upload service: chunk ingestion and archive finalization.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use unpackd_core::config::storage::DEFAULT_MAX_CHUNKS;
use unpackd_core::types::UploadId;
use unpackd_entity::upload::{FinalizedArchive, UploadRecord};
use unpackd_storage::chunked::{ChunkAssembler, Expectations};
use unpackd_storage::providers::LocalWorkspace;

use crate::UploadStore;

use super::error::UploadError;

/// Acknowledgement for one accepted chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkAck {
    /// Index that was stored.
    pub index: u32,
    /// Length of the stored chunk text.
    pub len: usize,
    /// Distinct chunks received so far.
    pub received_count: u32,
}

/// Client declarations sent with finalize.
#[derive(Debug, Clone, Default)]
pub struct FinalizeParams {
    /// Original file name of the archive.
    pub filename: String,
    /// Declared decoded size.
    pub size: Option<u64>,
    /// Declared SHA-256 as hex.
    pub sha256: Option<String>,
}

/// Owns the lifecycle of upload records.
#[derive(Clone)]
pub struct UploadService {
    store: UploadStore,
    workspace: Arc<LocalWorkspace>,
    assembler: ChunkAssembler,
    max_chunks: u32,
}

impl std::fmt::Debug for UploadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadService")
            .field("uploads", &self.store.len())
            .field("max_chunks", &self.max_chunks)
            .finish()
    }
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(store: UploadStore, workspace: Arc<LocalWorkspace>) -> Self {
        Self {
            store,
            workspace,
            assembler: ChunkAssembler::new(),
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }

    /// Cap the chunk count a first chunk may declare.
    pub fn with_max_chunks(mut self, max_chunks: u32) -> Self {
        self.max_chunks = max_chunks;
        self
    }

    /// Open a new, empty upload.
    pub fn create(&self) -> UploadId {
        let id = UploadId::new();
        self.store.insert(id, UploadRecord::new(id));
        info!(upload_id = %id, "Upload created");
        id
    }

    /// Store one chunk.
    ///
    /// The first accepted chunk must declare the chunk count; later
    /// declarations are ignored. Re-sending an index replaces its payload
    /// without changing the received count.
    pub async fn put_chunk(
        &self,
        id: UploadId,
        index: u32,
        payload: String,
        declared_total: Option<u32>,
    ) -> Result<ChunkAck, UploadError> {
        let handle = self.store.get(&id).ok_or(UploadError::InvalidToken)?;
        let mut record = handle.write().await;

        // Expired while this call waited for the lock.
        if record.is_reaped() {
            return Err(UploadError::InvalidToken);
        }
        if record.is_finalized() {
            return Err(UploadError::AlreadyFinalized);
        }

        let total = match (record.total_chunks(), declared_total) {
            (Some(total), Some(declared)) if declared != total => {
                debug!(
                    upload_id = %id,
                    total,
                    declared,
                    "Ignoring changed totalChunks declaration"
                );
                total
            }
            (Some(total), _) => total,
            (None, Some(declared)) if declared > self.max_chunks => {
                return Err(UploadError::TooManyChunks {
                    declared,
                    limit: self.max_chunks,
                });
            }
            (None, Some(declared)) if declared > 0 => declared,
            (None, _) => return Err(UploadError::TotalChunksRequired),
        };

        if index >= total {
            return Err(UploadError::IndexOutOfRange { index, total });
        }
        if payload.is_empty() {
            return Err(UploadError::EmptyChunk { index });
        }

        // Only an accepted chunk latches the count.
        record.latch_total(total);
        let len = payload.len();
        let fresh = record.store_chunk(index, payload);
        let received_count = record.received_count();
        debug!(
            upload_id = %id,
            index,
            len,
            fresh,
            received_count,
            total,
            "Chunk stored"
        );

        Ok(ChunkAck {
            index,
            len,
            received_count,
        })
    }

    /// Reassemble, verify and persist the archive.
    ///
    /// The record stays locked for the whole operation, so concurrent
    /// finalize calls are serialized and only the first can succeed.
    pub async fn finalize(
        &self,
        id: UploadId,
        params: FinalizeParams,
    ) -> Result<FinalizedArchive, UploadError> {
        let handle = self.store.get(&id).ok_or(UploadError::InvalidToken)?;
        let mut record = handle.write().await;

        // Expired while this call waited for the lock.
        if record.is_reaped() {
            return Err(UploadError::InvalidToken);
        }
        if record.is_finalized() {
            return Err(UploadError::AlreadyFinalized);
        }
        let Some(expected) = record.total_chunks() else {
            return Err(UploadError::NothingReceived);
        };

        let missing = record.missing_indices();
        if !missing.is_empty() {
            return Err(UploadError::MissingChunks {
                missing,
                received: record.received_count(),
                expected,
            });
        }

        let payload = self.assembler.assemble(
            &record.concatenated(),
            Expectations {
                size: params.size,
                sha256: params.sha256.as_deref(),
            },
        )?;

        let path = self.workspace.archive_path(id, &params.filename);
        self.workspace
            .write_archive(&path, &payload.bytes)
            .await
            .map_err(UploadError::Storage)?;

        let archive = FinalizedArchive {
            filename: params.filename,
            path,
            size: payload.bytes.len() as u64,
            sha256: payload.sha256,
        };
        record.finalize(archive.clone());

        info!(
            upload_id = %id,
            filename = %archive.filename,
            size = archive.size,
            sha256 = %archive.sha256,
            "Upload finalized"
        );
        Ok(archive)
    }

    /// Number of live upload records.
    pub fn count(&self) -> usize {
        self.store.len()
    }
}
