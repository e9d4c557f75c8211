//! Resident chunk storage keyed by [`ChunkKey`].
//!
//! The [`ChunkStore`] pages chunks in through its [`Pager`] on first access,
//! keeps at most `max_resident` of them, and evicts the least recently
//! accessed chunk when it needs room. Chunks are shared through [`Arc`], so a
//! chunk evicted while a sampler still reads from it stays alive until that
//! sampler moves on.
//!
//! A single-slot "last accessed" cache short-circuits the hash lookup for the
//! very common case of repeated access to the same chunk.

use std::sync::Arc;

use glam::IVec3;
use rustc_hash::FxHashMap;

use crate::chunk::Chunk;
use crate::pager::Pager;
use crate::region::Region;
use crate::voxel::Voxel;

/// Chunk-grid coordinates (volume coordinates shifted right by the chunk power).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ChunkKey {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Key of the chunk containing the volume position `p`.
    pub fn containing(p: IVec3, chunk_power: u8) -> Self {
        Self {
            x: p.x >> chunk_power,
            y: p.y >> chunk_power,
            z: p.z >> chunk_power,
        }
    }

    /// Volume position of the chunk's lowest voxel.
    pub fn lower_corner(self, chunk_power: u8) -> IVec3 {
        IVec3::new(self.x << chunk_power, self.y << chunk_power, self.z << chunk_power)
    }
}

struct ResidentChunk<V> {
    chunk: Arc<Chunk<V>>,
    /// Access stamp used to pick eviction victims.
    last_access: u64,
}

/// Owns every resident chunk of a volume.
pub struct ChunkStore<V: Voxel> {
    chunks: FxHashMap<ChunkKey, ResidentChunk<V>>,
    last_accessed: Option<(ChunkKey, Arc<Chunk<V>>)>,
    pager: Box<dyn Pager<V>>,
    chunk_power: u8,
    max_resident: usize,
    access_stamp: u64,
}

impl<V: Voxel> ChunkStore<V> {
    /// Creates an empty store. Arguments are validated by the owning volume.
    pub fn new(chunk_power: u8, max_resident: usize, pager: Box<dyn Pager<V>>) -> Self {
        Self {
            chunks: FxHashMap::default(),
            last_accessed: None,
            pager,
            chunk_power,
            max_resident,
            access_stamp: 0,
        }
    }

    pub fn chunk_power(&self) -> u8 {
        self.chunk_power
    }

    pub fn max_resident(&self) -> usize {
        self.max_resident
    }

    /// Number of chunks currently held by the store.
    pub fn resident_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_resident(&self, key: ChunkKey) -> bool {
        self.chunks.contains_key(&key)
    }

    /// Extent of a chunk in volume coordinates.
    pub fn chunk_region(&self, key: ChunkKey) -> Region {
        Region::from_size(
            key.lower_corner(self.chunk_power),
            IVec3::splat(1 << self.chunk_power),
        )
    }

    /// Returns true if `key` names the chunk in the last-accessed slot.
    #[inline]
    pub fn can_reuse_last_accessed(&self, key: ChunkKey) -> bool {
        matches!(&self.last_accessed, Some((last, _)) if *last == key)
    }

    /// The chunk in the last-accessed slot, if any.
    pub fn last_accessed(&self) -> Option<&Arc<Chunk<V>>> {
        self.last_accessed.as_ref().map(|(_, chunk)| chunk)
    }

    /// Returns the chunk for `key`, paging it in (and evicting another chunk)
    /// if needed. The result also becomes the last-accessed chunk.
    pub fn chunk(&mut self, key: ChunkKey) -> &Arc<Chunk<V>> {
        let slot = match self.last_accessed.take() {
            Some((last, chunk)) if last == key => (last, chunk),
            _ => (key, Arc::clone(&self.resident(key).chunk)),
        };
        &self.last_accessed.insert(slot).1
    }

    /// Mutable access to the chunk for `key`.
    ///
    /// Clears the last-accessed slot first so the store holds the only
    /// reference and no copy is made. Readers that still hold the chunk keep
    /// their own snapshot.
    pub fn chunk_mut(&mut self, key: ChunkKey) -> &mut Chunk<V> {
        self.last_accessed = None;
        Arc::make_mut(&mut self.resident(key).chunk)
    }

    /// Pages out every modified chunk and drops all resident chunks.
    pub fn flush_all(&mut self) {
        self.last_accessed = None;
        let keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        for key in keys {
            self.evict(key);
        }
    }

    fn resident(&mut self, key: ChunkKey) -> &mut ResidentChunk<V> {
        self.access_stamp += 1;
        if !self.chunks.contains_key(&key) {
            self.make_room();
        }

        let region = self.chunk_region(key);
        let chunk_power = self.chunk_power;
        let pager = &self.pager;
        let resident = self.chunks.entry(key).or_insert_with(|| {
            let mut chunk = Chunk::new(chunk_power);
            pager.page_in(&region, &mut chunk);
            tracing::trace!(?key, "paged in chunk");
            ResidentChunk {
                chunk: Arc::new(chunk),
                last_access: 0,
            }
        });
        resident.last_access = self.access_stamp;
        resident
    }

    /// Evicts least recently accessed chunks until one more fits.
    fn make_room(&mut self) {
        while self.chunks.len() >= self.max_resident {
            let oldest = self
                .chunks
                .iter()
                .min_by_key(|(_, resident)| resident.last_access)
                .map(|(key, _)| *key);
            match oldest {
                Some(key) => self.evict(key),
                None => break,
            }
        }
    }

    fn evict(&mut self, key: ChunkKey) {
        let Some(resident) = self.chunks.remove(&key) else {
            return;
        };
        if self.can_reuse_last_accessed(key) {
            self.last_accessed = None;
        }
        if resident.chunk.is_modified() {
            let region = self.chunk_region(key);
            self.pager.page_out(&region, &resident.chunk);
        }
        tracing::debug!(?key, modified = resident.chunk.is_modified(), "evicted chunk");
    }
}
