//! Chunk assembler: decodes the concatenated chunk text and verifies it.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Integrity failures detected while reassembling a payload.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// The concatenated chunks are not valid base64.
    #[error("chunk data is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded length differs from the declared size.
    #[error("size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Declared size.
        expected: u64,
        /// Decoded size.
        actual: u64,
    },

    /// The decoded content hashes to a different digest.
    #[error("sha256 mismatch: expected {expected}, got {actual}")]
    DigestMismatch {
        /// Declared digest (lowercase hex).
        expected: String,
        /// Computed digest (lowercase hex).
        actual: String,
    },
}

/// What the client declared about the whole payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct Expectations<'a> {
    /// Declared decoded size in bytes.
    pub size: Option<u64>,
    /// Declared SHA-256 as hex.
    pub sha256: Option<&'a str>,
}

/// A decoded and verified payload.
#[derive(Debug, Clone)]
pub struct AssembledPayload {
    /// The raw bytes.
    pub bytes: Vec<u8>,
    /// Lowercase hex SHA-256 of `bytes`.
    pub sha256: String,
}

/// Decodes reassembled chunk text and checks it against the client's
/// declarations.
#[derive(Debug, Clone)]
pub struct ChunkAssembler {
    engine: GeneralPurpose,
}

impl Default for ChunkAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkAssembler {
    /// Create an assembler for the standard base64 alphabet. Trailing padding
    /// is accepted but not required.
    pub fn new() -> Self {
        let config =
            GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
        Self {
            engine: GeneralPurpose::new(&alphabet::STANDARD, config),
        }
    }

    /// Decode `text` and verify it.
    ///
    /// ASCII whitespace (line-wrapped encoders) is ignored. The size check
    /// runs before hashing; a malformed declared digest is ignored rather
    /// than rejected.
    pub fn assemble(
        &self,
        text: &str,
        expect: Expectations<'_>,
    ) -> Result<AssembledPayload, AssemblyError> {
        let compact: Vec<u8> = text
            .bytes()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        let bytes = self.engine.decode(compact)?;
        let actual_size = bytes.len() as u64;

        if let Some(expected) = expect.size {
            if expected != actual_size {
                return Err(AssemblyError::SizeMismatch {
                    expected,
                    actual: actual_size,
                });
            }
        }

        let sha256 = sha256_hex(&bytes);

        match expect.sha256.map(normalize_digest) {
            Some(Some(expected)) if expected != sha256 => {
                return Err(AssemblyError::DigestMismatch {
                    expected,
                    actual: sha256,
                });
            }
            Some(None) => {
                tracing::warn!("Ignoring malformed sha256 declaration");
            }
            _ => {}
        }

        Ok(AssembledPayload { bytes, sha256 })
    }
}

/// Lowercase hex SHA-256 of `data`.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Lowercase a 64-character hex digest, or `None` if it is not one.
fn normalize_digest(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(trimmed.to_ascii_lowercase())
    } else {
        None
    }
}
