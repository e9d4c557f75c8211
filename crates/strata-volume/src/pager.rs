//! Paging hooks: how chunk contents are produced when a chunk becomes
//! resident, and where modified chunks go when they are evicted.

use glam::IVec3;

use crate::chunk::Chunk;
use crate::region::Region;
use crate::voxel::Voxel;

/// Fills chunks on page-in and receives modified chunks on page-out.
///
/// `region` is the chunk's extent in volume coordinates.
pub trait Pager<V: Voxel>: Send {
    /// Populates a freshly allocated (empty) chunk.
    fn page_in(&self, region: &Region, chunk: &mut Chunk<V>);

    /// Called with a modified chunk right before it is dropped from the store.
    fn page_out(&self, _region: &Region, _chunk: &Chunk<V>) {}
}

/// Leaves paged-in chunks empty and discards modifications on eviction.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyPager;

impl<V: Voxel> Pager<V> for EmptyPager {
    fn page_in(&self, _region: &Region, _chunk: &mut Chunk<V>) {}
}

/// Procedural pager: every voxel is computed from its volume position.
///
/// ```
/// use strata_volume::{GeneratorPager, PagedVolume, Region};
/// use glam::IVec3;
///
/// let pager = GeneratorPager::new(|p: IVec3| if p.y < 4 { 1u8 } else { 0 });
/// let bounds = Region::new(IVec3::ZERO, IVec3::splat(31));
/// let volume: PagedVolume<u8> = PagedVolume::new(bounds, 4, 64, pager).unwrap();
/// assert_eq!(volume.voxel(0, 3, 0), 1);
/// assert_eq!(volume.voxel(0, 4, 0), 0);
/// ```
pub struct GeneratorPager<F> {
    generate: F,
}

impl<F> GeneratorPager<F> {
    pub fn new(generate: F) -> Self {
        Self { generate }
    }
}

impl<V, F> Pager<V> for GeneratorPager<F>
where
    V: Voxel,
    F: Fn(IVec3) -> V + Send,
{
    fn page_in(&self, region: &Region, chunk: &mut Chunk<V>) {
        let lower = region.lower();
        chunk.fill_with(|x, y, z| {
            (self.generate)(lower + IVec3::new(x as i32, y as i32, z as i32))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pager_leaves_chunk_empty() {
        let mut chunk = Chunk::<u8>::new(2);
        let region = Region::from_size(IVec3::ZERO, IVec3::splat(4));
        EmptyPager.page_in(&region, &mut chunk);
        assert!(chunk.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_generator_pager_uses_volume_coordinates() {
        let pager = GeneratorPager::new(|p: IVec3| (p.x + p.y + p.z) as u16);
        let mut chunk = Chunk::<u16>::new(2);
        let region = Region::from_size(IVec3::new(4, 8, 12), IVec3::splat(4));
        pager.page_in(&region, &mut chunk);
        assert_eq!(chunk.voxel(0, 0, 0), 24);
        assert_eq!(chunk.voxel(3, 2, 1), 30);
    }
}
