//! Volume error types.

use crate::morton::MAX_CHUNK_POWER;

/// Errors reported by paged volumes and their samplers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VolumeError {
    /// The operation cannot be performed on this kind of accessor.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// Chunk side power outside `1..=MAX_CHUNK_POWER`.
    #[error("chunk side power {0} is outside 1..={max}", max = MAX_CHUNK_POWER)]
    InvalidChunkPower(u8),

    /// The store must be allowed to keep at least one chunk resident.
    #[error("resident chunk limit must be at least 1, got {0}")]
    InvalidResidentLimit(usize),
}
