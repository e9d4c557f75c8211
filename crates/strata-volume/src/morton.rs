//! Morton (Z-order) addressing inside a chunk.
//!
//! An in-chunk position `(x, y, z)` maps to the linear index
//! `MORTON_X[x] | MORTON_Y[y] | MORTON_Z[z]`, which interleaves the bits of
//! the three coordinates as `...z1y1x1z0y0x0`. Stepping one voxel along an
//! axis therefore changes the index by a coordinate-dependent amount, given
//! by the `DELTA_*` tables: moving from `k` to `k + 1` adds `DELTA_*[k]`,
//! moving from `k` to `k - 1` subtracts `DELTA_*[k - 1]`.
//!
//! The tables cover chunk sides up to [`MAX_CHUNK_SIDE`]. They are computed at
//! compile time and never change.

use static_assertions::const_assert;

/// Largest supported chunk side power (`2^8 = 256` voxels).
pub const MAX_CHUNK_POWER: u8 = 8;

/// Largest supported chunk side length in voxels.
pub const MAX_CHUNK_SIDE: usize = 1 << MAX_CHUNK_POWER;

const_assert!(MAX_CHUNK_SIDE <= 256);

/// Interleaved bits for the X coordinate.
pub const MORTON_X: [u32; MAX_CHUNK_SIDE] = morton_table(0);
/// Interleaved bits for the Y coordinate.
pub const MORTON_Y: [u32; MAX_CHUNK_SIDE] = morton_table(1);
/// Interleaved bits for the Z coordinate.
pub const MORTON_Z: [u32; MAX_CHUNK_SIDE] = morton_table(2);

/// Index offset for stepping from `x` to `x + 1`.
pub const DELTA_X: [u32; MAX_CHUNK_SIDE] = delta_table(0);
/// Index offset for stepping from `y` to `y + 1`.
pub const DELTA_Y: [u32; MAX_CHUNK_SIDE] = delta_table(1);
/// Index offset for stepping from `z` to `z + 1`.
pub const DELTA_Z: [u32; MAX_CHUNK_SIDE] = delta_table(2);

/// Spreads the low 8 bits of `value` three positions apart, starting at `shift`.
const fn spread_bits(value: u32, shift: u32) -> u32 {
    let mut result = 0;
    let mut bit = 0;
    while bit < 9 {
        if value & (1 << bit) != 0 {
            result |= 1 << (3 * bit + shift);
        }
        bit += 1;
    }
    result
}

const fn morton_table(shift: u32) -> [u32; MAX_CHUNK_SIDE] {
    let mut table = [0; MAX_CHUNK_SIDE];
    let mut i = 0;
    while i < MAX_CHUNK_SIDE {
        table[i] = spread_bits(i as u32, shift);
        i += 1;
    }
    table
}

const fn delta_table(shift: u32) -> [u32; MAX_CHUNK_SIDE] {
    let mut table = [0; MAX_CHUNK_SIDE];
    let mut i = 0;
    while i < MAX_CHUNK_SIDE {
        // The last entry steps out of a 256-voxel chunk and is never used for
        // addressing, but stays well defined.
        table[i] = spread_bits(i as u32 + 1, shift) - spread_bits(i as u32, shift);
        i += 1;
    }
    table
}

/// Morton index of an in-chunk position.
#[inline]
pub fn morton_index(x: u16, y: u16, z: u16) -> usize {
    (MORTON_X[x as usize] | MORTON_Y[y as usize] | MORTON_Z[z as usize]) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_entries_interleave() {
        assert_eq!(&MORTON_X[..4], &[0, 1, 8, 9]);
        assert_eq!(&MORTON_Y[..4], &[0, 2, 16, 18]);
        assert_eq!(&MORTON_Z[..4], &[0, 4, 32, 36]);
    }

    #[test]
    fn test_delta_tables_match_known_values() {
        assert_eq!(&DELTA_X[..8], &[1, 7, 1, 55, 1, 7, 1, 439]);
        assert_eq!(&DELTA_Y[..8], &[2, 14, 2, 110, 2, 14, 2, 878]);
        assert_eq!(&DELTA_Z[..8], &[4, 28, 4, 220, 4, 28, 4, 1756]);
        assert_eq!(DELTA_X[127], 1_797_559);
        assert_eq!(DELTA_Y[127], 3_595_118);
        assert_eq!(DELTA_Z[127], 7_190_236);
    }

    #[test]
    fn test_deltas_step_between_neighbours() {
        for k in 0..MAX_CHUNK_SIDE - 1 {
            assert_eq!(MORTON_X[k] + DELTA_X[k], MORTON_X[k + 1]);
            assert_eq!(MORTON_Y[k] + DELTA_Y[k], MORTON_Y[k + 1]);
            assert_eq!(MORTON_Z[k] + DELTA_Z[k], MORTON_Z[k + 1]);
        }
    }

    #[test]
    fn test_morton_index_is_a_bijection_for_small_chunk() {
        let side = 8u16;
        let mut seen = vec![false; (side as usize).pow(3)];
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    let index = morton_index(x, y, z);
                    assert!(index < seen.len());
                    assert!(!seen[index], "duplicate index {index}");
                    seen[index] = true;
                }
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_full_chunk_max_index() {
        let max = MAX_CHUNK_SIDE as u16 - 1;
        assert_eq!(morton_index(max, max, max), MAX_CHUNK_SIDE.pow(3) - 1);
    }
}
