//! Surface extraction for paged voxel volumes: decimated marching cubes and
//! the indexed mesh it produces.

pub mod decimated;
pub mod error;
pub mod mesh;
pub mod tables;

pub use decimated::{
    MAX_LEVEL, classify_cell, extract_decimated_surface, extract_decimated_surface_to_mesh,
    step_size,
};
pub use error::{ExtractError, MeshError};
pub use mesh::{Mesh, MeshIndex, MeshVertex};
