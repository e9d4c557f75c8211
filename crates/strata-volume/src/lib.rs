//! Paged voxel volumes: Morton-ordered chunks, a bounded chunk store with
//! pluggable paging, and the [`Sampler`] cursor used by surface extraction.

pub mod chunk;
pub mod chunk_store;
pub mod error;
pub mod morton;
pub mod pager;
pub mod region;
pub mod sampler;
pub mod volume;
pub mod voxel;

pub use chunk::Chunk;
pub use chunk_store::{ChunkKey, ChunkStore};
pub use error::VolumeError;
pub use pager::{EmptyPager, GeneratorPager, Pager};
pub use region::Region;
pub use sampler::Sampler;
pub use volume::{PagedVolume, VolumeSettings};
pub use voxel::Voxel;
