//! The paged voxel volume.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::IVec3;

use crate::chunk::Chunk;
use crate::chunk_store::{ChunkKey, ChunkStore};
use crate::error::VolumeError;
use crate::morton::MAX_CHUNK_POWER;
use crate::pager::Pager;
use crate::region::Region;
use crate::sampler::Sampler;
use crate::voxel::Voxel;

/// Chunk sizing and residency limits for a [`PagedVolume`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeSettings {
    /// Chunk side length as a power of two (`1..=8`).
    pub chunk_power: u8,
    /// Maximum number of chunks kept in memory at once.
    pub max_resident_chunks: usize,
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            chunk_power: 5,
            max_resident_chunks: 1024,
        }
    }
}

/// A voxel volume stored as lazily paged, Morton-ordered chunks.
///
/// Reads take `&self` and may page chunks in, so the chunk store sits behind
/// a mutex. Writes take `&mut self`; a [`Sampler`] borrows the volume, so no
/// write can happen while a sampler is alive.
///
/// The enclosing region only bounds surface extraction. Any position can be
/// read or written; chunks outside the region are paged like any other.
pub struct PagedVolume<V: Voxel> {
    enclosing_region: Region,
    chunk_power: u8,
    store: Mutex<ChunkStore<V>>,
}

impl<V: Voxel> PagedVolume<V> {
    /// Creates a volume whose chunks have `2^chunk_power` voxels per side.
    pub fn new(
        enclosing_region: Region,
        chunk_power: u8,
        max_resident_chunks: usize,
        pager: impl Pager<V> + 'static,
    ) -> Result<Self, VolumeError> {
        if !(1..=MAX_CHUNK_POWER).contains(&chunk_power) {
            return Err(VolumeError::InvalidChunkPower(chunk_power));
        }
        if max_resident_chunks == 0 {
            return Err(VolumeError::InvalidResidentLimit(max_resident_chunks));
        }
        if !enclosing_region.is_valid() {
            tracing::warn!(?enclosing_region, "volume created with an empty enclosing region");
        }

        tracing::debug!(chunk_power, max_resident_chunks, "created paged volume");

        Ok(Self {
            enclosing_region,
            chunk_power,
            store: Mutex::new(ChunkStore::new(
                chunk_power,
                max_resident_chunks,
                Box::new(pager),
            )),
        })
    }

    /// Creates a volume from configured settings.
    pub fn from_config(
        enclosing_region: Region,
        settings: &VolumeSettings,
        pager: impl Pager<V> + 'static,
    ) -> Result<Self, VolumeError> {
        Self::new(
            enclosing_region,
            settings.chunk_power,
            settings.max_resident_chunks,
            pager,
        )
    }

    pub fn enclosing_region(&self) -> Region {
        self.enclosing_region
    }

    pub fn chunk_power(&self) -> u8 {
        self.chunk_power
    }

    pub fn chunk_side_length(&self) -> u16 {
        1 << self.chunk_power
    }

    /// Number of chunks currently in memory.
    pub fn resident_chunk_count(&self) -> usize {
        self.lock_store().resident_count()
    }

    /// Reads the voxel at an absolute position.
    pub fn voxel(&self, x: i32, y: i32, z: i32) -> V {
        self.voxel_at(IVec3::new(x, y, z))
    }

    pub fn voxel_at(&self, position: IVec3) -> V {
        let (key, [x, y, z]) = self.locate(position);
        self.lock_store().chunk(key).voxel(x, y, z)
    }

    /// Writes the voxel at an absolute position and marks its chunk modified.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, value: V) {
        let (key, [lx, ly, lz]) = self.locate(IVec3::new(x, y, z));
        self.store
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .chunk_mut(key)
            .set_voxel(lx, ly, lz, value);
    }

    /// Pages out every modified chunk and releases all resident chunks.
    pub fn flush_all(&mut self) {
        self.store
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .flush_all();
    }

    /// A cursor positioned at the lower corner of the enclosing region.
    pub fn sampler(&self) -> Sampler<'_, V> {
        Sampler::new(self)
    }

    /// Splits an absolute position into its chunk key and in-chunk coordinates.
    pub(crate) fn locate(&self, position: IVec3) -> (ChunkKey, [u16; 3]) {
        let key = ChunkKey::containing(position, self.chunk_power);
        let local = position - key.lower_corner(self.chunk_power);
        (key, [local.x as u16, local.y as u16, local.z as u16])
    }

    /// Resolves a chunk for a sampler, going through the last-accessed slot.
    pub(crate) fn chunk(&self, key: ChunkKey) -> Arc<Chunk<V>> {
        Arc::clone(self.lock_store().chunk(key))
    }

    fn lock_store(&self) -> MutexGuard<'_, ChunkStore<V>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::{EmptyPager, GeneratorPager};

    fn bounds() -> Region {
        Region::new(IVec3::ZERO, IVec3::splat(63))
    }

    #[test]
    fn test_rejects_invalid_chunk_power() {
        for power in [0, 9, 200] {
            let err = PagedVolume::<u8>::new(bounds(), power, 8, EmptyPager).err();
            assert_eq!(err, Some(VolumeError::InvalidChunkPower(power)));
        }
        assert!(PagedVolume::<u8>::new(bounds(), 1, 8, EmptyPager).is_ok());
        assert!(PagedVolume::<u8>::new(bounds(), 8, 8, EmptyPager).is_ok());
    }

    #[test]
    fn test_rejects_zero_resident_limit() {
        let err = PagedVolume::<u8>::new(bounds(), 4, 0, EmptyPager).err();
        assert_eq!(err, Some(VolumeError::InvalidResidentLimit(0)));
    }

    #[test]
    fn test_from_config_uses_settings() {
        let settings = VolumeSettings {
            chunk_power: 3,
            max_resident_chunks: 16,
        };
        let volume = PagedVolume::<u16>::from_config(bounds(), &settings, EmptyPager).unwrap();
        assert_eq!(volume.chunk_power(), 3);
        assert_eq!(volume.chunk_side_length(), 8);
        assert_eq!(volume.enclosing_region(), bounds());
    }

    #[test]
    fn test_set_then_get_across_chunks_and_negative_coordinates() {
        let mut volume = PagedVolume::<u8>::new(bounds(), 3, 64, EmptyPager).unwrap();
        let points = [
            IVec3::new(0, 0, 0),
            IVec3::new(7, 8, 9),
            IVec3::new(-1, -1, -1),
            IVec3::new(-9, 17, -33),
            IVec3::new(100, 0, -100),
        ];
        for (i, p) in points.iter().enumerate() {
            volume.set_voxel(p.x, p.y, p.z, i as u8 + 1);
        }
        for (i, p) in points.iter().enumerate() {
            assert_eq!(volume.voxel_at(*p), i as u8 + 1, "at {p}");
        }
        assert_eq!(volume.voxel(1, 0, 0), 0);
    }

    #[test]
    fn test_generator_pager_discards_writes_on_eviction() {
        let pager = GeneratorPager::new(|p: IVec3| (p.x & 0xff) as u8);
        let mut volume = PagedVolume::<u8>::new(bounds(), 2, 1, pager).unwrap();
        volume.set_voxel(1, 0, 0, 99);
        assert_eq!(volume.voxel(1, 0, 0), 99);
        volume.voxel(20, 0, 0);
        assert_eq!(volume.resident_chunk_count(), 1);
        assert_eq!(volume.voxel(1, 0, 0), 1);
    }

    #[test]
    fn test_resident_count_is_bounded() {
        let volume = PagedVolume::<u8>::new(bounds(), 2, 4, EmptyPager).unwrap();
        for x in 0..16 {
            volume.voxel(x * 4, 0, 0);
            assert!(volume.resident_chunk_count() <= 4);
        }
        assert_eq!(volume.resident_chunk_count(), 4);
    }

    #[test]
    fn test_flush_all_releases_chunks() {
        let mut volume = PagedVolume::<u8>::new(bounds(), 2, 16, EmptyPager).unwrap();
        volume.set_voxel(0, 0, 0, 1);
        volume.voxel(9, 9, 9);
        assert_eq!(volume.resident_chunk_count(), 2);
        volume.flush_all();
        assert_eq!(volume.resident_chunk_count(), 0);
    }

    #[test]
    fn test_sampler_starts_at_enclosing_lower_corner() {
        let region = Region::new(IVec3::new(-5, 3, 12), IVec3::new(10, 10, 20));
        let mut volume = PagedVolume::<u8>::new(region, 3, 16, EmptyPager).unwrap();
        volume.set_voxel(-5, 3, 12, 4);
        let sampler = volume.sampler();
        assert_eq!(sampler.position(), IVec3::new(-5, 3, 12));
        assert_eq!(sampler.voxel(), 4);
    }

    #[test]
    fn test_volume_is_shareable_across_threads() {
        let pager = GeneratorPager::new(|p: IVec3| (p.x + p.y + p.z).rem_euclid(7) as u8);
        let volume = PagedVolume::<u8>::new(bounds(), 3, 8, pager).unwrap();
        std::thread::scope(|scope| {
            for t in 0..4 {
                let volume = &volume;
                scope.spawn(move || {
                    for i in 0..200 {
                        let p = IVec3::new(i % 64, (i * 3 + t) % 64, (i * 7) % 64);
                        let expected = (p.x + p.y + p.z).rem_euclid(7) as u8;
                        assert_eq!(volume.voxel_at(p), expected);
                    }
                });
            }
        });
    }
}
