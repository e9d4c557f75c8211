//! Cursor over a [`PagedVolume`] with incremental Morton addressing.
//!
//! A [`Sampler`] keeps the chunk under its position and the Morton index of
//! the voxel it points at. Unit moves and neighbour peeks that stay inside that
//! chunk adjust the index with the precomputed `DELTA_*` tables; anything that
//! crosses a chunk boundary falls back to a full resolve through the volume.

use std::sync::Arc;

use glam::IVec3;

use crate::chunk::Chunk;
use crate::error::VolumeError;
use crate::morton::{DELTA_X, DELTA_Y, DELTA_Z, morton_index};
use crate::volume::PagedVolume;
use crate::voxel::Voxel;

const DELTAS: [&[u32; 256]; 3] = [&DELTA_X, &DELTA_Y, &DELTA_Z];

/// A read cursor bound to a volume.
///
/// Invariant: `chunk.voxel_at_index(index)` is always the voxel at `position`.
pub struct Sampler<'a, V: Voxel> {
    volume: &'a PagedVolume<V>,
    position: IVec3,
    in_chunk: [u16; 3],
    chunk: Arc<Chunk<V>>,
    index: usize,
    side_minus_one: u16,
}

impl<'a, V: Voxel> Sampler<'a, V> {
    /// Creates a sampler at the lower corner of the volume's enclosing region.
    pub fn new(volume: &'a PagedVolume<V>) -> Self {
        let position = volume.enclosing_region().lower();
        let (key, in_chunk) = volume.locate(position);
        Self {
            volume,
            position,
            in_chunk,
            chunk: volume.chunk(key),
            index: morton_index(in_chunk[0], in_chunk[1], in_chunk[2]),
            side_minus_one: volume.chunk_side_length() - 1,
        }
    }

    pub fn volume(&self) -> &'a PagedVolume<V> {
        self.volume
    }

    /// Logical position of the cursor in volume coordinates.
    pub fn position(&self) -> IVec3 {
        self.position
    }

    /// Position inside the current chunk.
    pub fn in_chunk_position(&self) -> [u16; 3] {
        self.in_chunk
    }

    /// Morton index of the current voxel within its chunk.
    pub fn chunk_index(&self) -> usize {
        self.index
    }

    /// Moves the cursor to an absolute position.
    pub fn set_position(&mut self, x: i32, y: i32, z: i32) {
        self.set_position_vec(IVec3::new(x, y, z));
    }

    pub fn set_position_vec(&mut self, position: IVec3) {
        let (key, in_chunk) = self.volume.locate(position);
        self.position = position;
        self.in_chunk = in_chunk;
        self.index = morton_index(in_chunk[0], in_chunk[1], in_chunk[2]);
        self.chunk = self.volume.chunk(key);
    }

    /// The voxel under the cursor.
    #[inline]
    pub fn voxel(&self) -> V {
        self.chunk.voxel_at_index(self.index)
    }

    /// Always fails: samplers are read-only. Write through
    /// [`PagedVolume::set_voxel`] once no sampler borrows the volume.
    pub fn set_voxel(&mut self, _value: V) -> Result<(), VolumeError> {
        Err(VolumeError::UnsupportedOperation(
            "writing through a volume sampler",
        ))
    }

    // --- Moves ---

    pub fn move_positive_x(&mut self) {
        self.step(0, true);
    }

    pub fn move_positive_y(&mut self) {
        self.step(1, true);
    }

    pub fn move_positive_z(&mut self) {
        self.step(2, true);
    }

    pub fn move_negative_x(&mut self) {
        self.step(0, false);
    }

    pub fn move_negative_y(&mut self) {
        self.step(1, false);
    }

    pub fn move_negative_z(&mut self) {
        self.step(2, false);
    }

    #[inline]
    fn step(&mut self, axis: usize, positive: bool) {
        let coord = self.in_chunk[axis];
        if positive {
            self.position[axis] += 1;
            if coord < self.side_minus_one {
                self.index += DELTAS[axis][coord as usize] as usize;
                self.in_chunk[axis] = coord + 1;
                return;
            }
        } else {
            self.position[axis] -= 1;
            if coord > 0 {
                self.index -= DELTAS[axis][coord as usize - 1] as usize;
                self.in_chunk[axis] = coord - 1;
                return;
            }
        }
        self.set_position_vec(self.position);
    }

    // --- Peeks ---

    /// Returns true if the voxel at offset `(dx, dy, dz)` lies in the current
    /// chunk and can be read by index arithmetic. Offsets are in `-1..=1`.
    #[inline]
    pub fn can_peek_in_chunk(&self, dx: i32, dy: i32, dz: i32) -> bool {
        let max = self.side_minus_one;
        [dx, dy, dz]
            .into_iter()
            .zip(self.in_chunk)
            .all(|(d, coord)| match d {
                0 => true,
                1 => coord < max,
                -1 => coord > 0,
                _ => false,
            })
    }

    /// Reads the voxel at `position + (dx, dy, dz)`.
    ///
    /// Unit offsets inside the current chunk use the fast path; everything
    /// else, including offsets larger than one, is a full volume read.
    #[inline]
    pub fn peek_offset(&self, dx: i32, dy: i32, dz: i32) -> V {
        if self.can_peek_in_chunk(dx, dy, dz) {
            let mut index = self.index;
            for (axis, d) in [dx, dy, dz].into_iter().enumerate() {
                let coord = self.in_chunk[axis] as usize;
                match d {
                    1 => index += DELTAS[axis][coord] as usize,
                    -1 => index -= DELTAS[axis][coord - 1] as usize,
                    _ => {}
                }
            }
            self.chunk.voxel_at_index(index)
        } else {
            self.volume.voxel_at(self.position + IVec3::new(dx, dy, dz))
        }
    }

    /// Compile-time checked neighbour read, e.g. `peek::<1, 0, -1>()`.
    #[inline]
    pub fn peek<const DX: i32, const DY: i32, const DZ: i32>(&self) -> V {
        const {
            assert!(DX >= -1 && DX <= 1, "peek offsets must be in -1..=1");
            assert!(DY >= -1 && DY <= 1, "peek offsets must be in -1..=1");
            assert!(DZ >= -1 && DZ <= 1, "peek offsets must be in -1..=1");
        }
        self.peek_offset(DX, DY, DZ)
    }

    /// Voxel value of the `2^level` block anchored at the cursor.
    ///
    /// The block takes the minimum of its voxels, so a block containing any
    /// empty voxel reads as empty.
    pub fn sub_sampled_voxel(&self, level: u8) -> V {
        match level {
            0 => self.voxel(),
            1 => [
                self.voxel(),
                self.peek::<1, 0, 0>(),
                self.peek::<0, 1, 0>(),
                self.peek::<1, 1, 0>(),
                self.peek::<0, 0, 1>(),
                self.peek::<1, 0, 1>(),
                self.peek::<0, 1, 1>(),
                self.peek::<1, 1, 1>(),
            ]
            .into_iter()
            .fold(V::MAX, V::min),
            _ => {
                debug_assert!(level < 16, "sub-sample level {level} is too large");
                let size = 1i32 << level;
                let mut value = V::MAX;
                for z in 0..size {
                    for y in 0..size {
                        for x in 0..size {
                            value = value.min(
                                self.volume.voxel_at(self.position + IVec3::new(x, y, z)),
                            );
                        }
                    }
                }
                value
            }
        }
    }
}
