//! Mesh and extraction errors.

/// Errors raised while building a [`crate::Mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// The index type cannot address another vertex.
    #[error("mesh vertex capacity exceeded: index type allows at most {max} vertices")]
    CapacityExceeded { max: usize },
}

/// Errors returned by surface extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Requested level of detail exceeds the supported maximum.
    #[error("level of detail {level} exceeds the maximum of {max}")]
    LevelTooLarge { level: u8, max: u8 },
}
