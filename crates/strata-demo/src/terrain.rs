//! Simplex heightfield used to fill the demo volume.

use glam::IVec3;
use noise::{NoiseFn, Simplex};
use strata_config::TerrainConfig;

/// Voxel below the soil layer.
pub const STONE: u8 = 1;
/// Voxel within [`SOIL_DEPTH`] of the surface.
pub const SOIL: u8 = 2;
/// Thickness of the soil layer in voxels.
pub const SOIL_DEPTH: f64 = 3.0;

/// Solid below a single-octave simplex height field.
pub struct Terrain {
    noise: Simplex,
    params: TerrainConfig,
}

impl Terrain {
    pub fn new(params: TerrainConfig) -> Self {
        Self {
            noise: Simplex::new(params.seed),
            params,
        }
    }

    /// Surface height at a column. Always within `base_height ± amplitude`.
    pub fn height_at(&self, x: i32, z: i32) -> f64 {
        let nx = x as f64 * self.params.frequency;
        let nz = z as f64 * self.params.frequency;
        let n = self.noise.get([nx, nz]).clamp(-1.0, 1.0);
        self.params.base_height + n * self.params.amplitude
    }

    pub fn voxel_at(&self, p: IVec3) -> u8 {
        let height = self.height_at(p.x, p.z);
        let y = p.y as f64;
        if y >= height {
            0
        } else if y >= height - SOIL_DEPTH {
            SOIL
        } else {
            STONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> TerrainConfig {
        TerrainConfig {
            seed: 3,
            base_height: 40.0,
            amplitude: 10.0,
            frequency: 0.05,
        }
    }

    #[test]
    fn test_height_stays_within_amplitude() {
        let terrain = Terrain::new(params());
        for x in -50..50 {
            for z in -50..50 {
                let h = terrain.height_at(x, z);
                assert!((30.0..=50.0).contains(&h), "height {h} at ({x}, {z})");
            }
        }
    }

    #[test]
    fn test_columns_are_layered() {
        let terrain = Terrain::new(params());
        for x in 0..16 {
            for z in 0..16 {
                assert_eq!(terrain.voxel_at(IVec3::new(x, 0, z)), STONE);
                assert_eq!(terrain.voxel_at(IVec3::new(x, 60, z)), 0);

                let top = (0..60)
                    .rev()
                    .find(|&y| terrain.voxel_at(IVec3::new(x, y, z)) != 0)
                    .unwrap();
                assert_eq!(terrain.voxel_at(IVec3::new(x, top, z)), SOIL);
            }
        }
    }

    #[test]
    fn test_same_seed_same_terrain() {
        let a = Terrain::new(params());
        let b = Terrain::new(params());
        for x in 0..32 {
            assert_eq!(a.height_at(x, x * 3), b.height_at(x, x * 3));
        }
    }
}
