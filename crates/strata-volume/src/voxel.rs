//! The [`Voxel`] trait: the scalar stored in every volume cell.
//!
//! Zero is empty space. Any non-zero value is solid and doubles as the
//! material id of that voxel.

use std::fmt::Debug;
use std::ops::BitOr;

/// A voxel value that can be stored in a [`PagedVolume`](crate::PagedVolume).
///
/// Ordering is used for min-aggregation when sub-sampling, and `BitOr` for
/// material selection on surface edges (exactly one of the two end points is
/// empty, so the OR yields the solid one).
pub trait Voxel:
    Copy + Ord + Default + BitOr<Output = Self> + Debug + Send + Sync + 'static
{
    /// The empty (outside) value.
    const EMPTY: Self;
    /// The largest representable value, the identity for min-aggregation.
    const MAX: Self;

    /// Returns `true` for the empty value.
    #[inline]
    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// Widens the value to a material id.
    fn material_id(self) -> u32;
}

macro_rules! impl_voxel {
    ($($t:ty),*) => {
        $(
            impl Voxel for $t {
                const EMPTY: Self = 0;
                const MAX: Self = <$t>::MAX;

                #[inline]
                fn material_id(self) -> u32 {
                    self as u32
                }
            }
        )*
    };
}

impl_voxel!(u8, u16, u32);
