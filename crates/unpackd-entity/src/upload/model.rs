//! Upload record model.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use unpackd_core::types::{JobId, UploadId};

/// The reassembled, verified archive produced by a successful finalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedArchive {
    /// Client-supplied file name.
    pub filename: String,
    /// Where the decoded bytes were written.
    pub path: PathBuf,
    /// Decoded size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the decoded bytes.
    pub sha256: String,
}

/// One in-progress or completed chunked transfer.
///
/// Chunk slots are sparse, so storage grows with the chunks actually
/// received. The declared count itself is bounded by the upload service.
#[derive(Debug)]
pub struct UploadRecord {
    /// Upload token.
    pub id: UploadId,
    /// Wall-clock creation time, for reporting.
    pub created_at: DateTime<Utc>,
    /// Monotonic creation time, used for expiry.
    pub born: Instant,
    total_chunks: Option<u32>,
    parts: BTreeMap<u32, String>,
    received_count: u32,
    finalized: Option<FinalizedArchive>,
    claimed_by: Option<JobId>,
    reaped: bool,
}

impl UploadRecord {
    /// Create an empty record with no declared chunk count.
    pub fn new(id: UploadId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            born: Instant::now(),
            total_chunks: None,
            parts: BTreeMap::new(),
            received_count: 0,
            finalized: None,
            claimed_by: None,
            reaped: false,
        }
    }

    /// The declared chunk count, once latched.
    pub fn total_chunks(&self) -> Option<u32> {
        self.total_chunks
    }

    /// Latch the chunk count if it is not set yet and return the effective
    /// value. A later, different declaration never replaces the first one.
    pub fn latch_total(&mut self, declared: u32) -> u32 {
        *self.total_chunks.get_or_insert(declared)
    }

    /// Store a chunk payload at `index`.
    ///
    /// Returns `true` when the slot went from absent to present. Returns
    /// `false` for an overwrite, and also (without storing) for an empty
    /// payload, an unset chunk count, or an out-of-range index; callers are
    /// expected to reject those cases before calling.
    pub fn store_chunk(&mut self, index: u32, payload: String) -> bool {
        let Some(total) = self.total_chunks else {
            return false;
        };
        if index >= total || payload.is_empty() {
            return false;
        }
        let newly_filled = self.parts.insert(index, payload).is_none();
        if newly_filled {
            self.received_count += 1;
        }
        newly_filled
    }

    /// Number of distinct slots ever filled.
    pub fn received_count(&self) -> u32 {
        self.received_count
    }

    /// Sorted indices in `0..total_chunks` that hold no usable chunk.
    pub fn missing_indices(&self) -> Vec<u32> {
        let Some(total) = self.total_chunks else {
            return Vec::new();
        };
        (0..total)
            .filter(|i| self.parts.get(i).is_none_or(|p| p.is_empty()))
            .collect()
    }

    /// Concatenate every slot in index order.
    ///
    /// Only meaningful once [`missing_indices`](Self::missing_indices) is
    /// empty.
    pub fn concatenated(&self) -> String {
        let capacity = self.parts.values().map(String::len).sum();
        let mut text = String::with_capacity(capacity);
        for part in self.parts.values() {
            text.push_str(part);
        }
        text
    }

    /// Record the finalized archive and release the chunk buffers.
    pub fn finalize(&mut self, archive: FinalizedArchive) {
        self.finalized = Some(archive);
        self.parts.clear();
    }

    /// The finalized archive, if finalize has succeeded.
    pub fn finalized(&self) -> Option<&FinalizedArchive> {
        self.finalized.as_ref()
    }

    /// Whether finalize has succeeded.
    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }

    /// Hand the archive to a job. Succeeds once: the archive is single-use.
    pub fn claim(&mut self, job_id: JobId) -> Option<PathBuf> {
        if self.claimed_by.is_some() {
            return None;
        }
        let path = self.finalized.as_ref()?.path.clone();
        self.claimed_by = Some(job_id);
        Some(path)
    }

    /// The job that consumed the archive.
    pub fn claimed_by(&self) -> Option<JobId> {
        self.claimed_by
    }

    /// Mark the record as removed from its store. Callers that obtained the
    /// handle earlier must treat it as gone once they hold the lock.
    pub fn mark_reaped(&mut self) {
        self.reaped = true;
    }

    /// Whether the record was removed from its store.
    pub fn is_reaped(&self) -> bool {
        self.reaped
    }

    /// Age of the record relative to `now`.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.born)
    }
}
