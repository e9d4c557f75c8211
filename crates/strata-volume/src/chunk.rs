//! Cubic voxel chunk stored in Morton order.

use crate::morton::morton_index;
use crate::voxel::Voxel;

/// A cubic block of `2^power` voxels per side.
///
/// Voxels live in one flat buffer in Morton order so that spatially close
/// voxels are close in memory. Coordinates passed to the accessors are
/// in-chunk coordinates in `[0, side_length)`.
#[derive(Clone, Debug)]
pub struct Chunk<V> {
    data: Box<[V]>,
    power: u8,
    /// Set by every write; a modified chunk is handed to the pager on eviction.
    modified: bool,
}

impl<V: Voxel> Chunk<V> {
    /// Creates an empty chunk. `power` must already be validated by the volume.
    pub fn new(power: u8) -> Self {
        let side = 1usize << power;
        Self {
            data: vec![V::EMPTY; side * side * side].into_boxed_slice(),
            power,
            modified: false,
        }
    }

    pub fn power(&self) -> u8 {
        self.power
    }

    pub fn side_length(&self) -> u16 {
        1 << self.power
    }

    /// Number of voxels in the chunk.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the voxel at an in-chunk position.
    #[inline]
    pub fn voxel(&self, x: u16, y: u16, z: u16) -> V {
        self.data[morton_index(x, y, z)]
    }

    /// Returns the voxel at a Morton index.
    #[inline]
    pub fn voxel_at_index(&self, index: usize) -> V {
        self.data[index]
    }

    /// Writes a voxel and marks the chunk modified.
    pub fn set_voxel(&mut self, x: u16, y: u16, z: u16, value: V) {
        self.data[morton_index(x, y, z)] = value;
        self.modified = true;
    }

    /// Fills every voxel from `f(x, y, z)` (in-chunk coordinates).
    ///
    /// Used by pagers; does not mark the chunk modified.
    pub fn fill_with(&mut self, mut f: impl FnMut(u16, u16, u16) -> V) {
        let side = self.side_length();
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    self.data[morton_index(x, y, z)] = f(x, y, z);
                }
            }
        }
    }

    /// Raw voxel buffer in Morton order.
    pub fn data(&self) -> &[V] {
        &self.data
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }
}
