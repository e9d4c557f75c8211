//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Paged volume layout.
    pub volume: VolumeConfig,
    /// Surface extraction settings.
    pub extraction: ExtractionConfig,
    /// Procedural terrain used to fill the volume.
    pub terrain: TerrainConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Paged volume configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeConfig {
    /// Chunk side length as a power of two (1..=8).
    pub chunk_power: u8,
    /// Maximum number of chunks kept in memory.
    pub max_resident_chunks: usize,
    /// Side length of the cubic enclosing region, starting at the origin.
    pub size: i32,
}

/// Surface extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Levels of detail to extract, each a power-of-two step.
    pub levels: Vec<u8>,
    /// Lower corner of the extracted region (inclusive).
    pub region_lower: [i32; 3],
    /// Upper corner of the extracted region (inclusive).
    pub region_upper: [i32; 3],
}

/// Terrain generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainConfig {
    /// Noise seed.
    pub seed: u32,
    /// Base height of the terrain surface in voxels.
    pub base_height: f64,
    /// Height variation above and below the base in voxels.
    pub amplitude: f64,
    /// Horizontal noise frequency per voxel.
    pub frequency: f64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log filter (e.g. "debug", "info,strata_volume=trace").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            chunk_power: 5,
            max_resident_chunks: 1024,
            size: 256,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            levels: vec![0, 1, 2],
            region_lower: [0, 0, 0],
            region_upper: [127, 127, 127],
        }
    }
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 7,
            base_height: 64.0,
            amplitude: 24.0,
            frequency: 0.02,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Default config directory (`<platform config dir>/strata`).
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("strata"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load `config.ron` from the given directory, or create it with defaults.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Re-reads the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Checks values the volume and extractor do not validate themselves.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.volume.size < 2 {
            return Err(ConfigError::Invalid {
                field: "volume.size",
                reason: format!("must be at least 2, got {}", self.volume.size),
            });
        }
        if self.extraction.levels.is_empty() {
            return Err(ConfigError::Invalid {
                field: "extraction.levels",
                reason: "at least one level is required".to_string(),
            });
        }
        let lower = self.extraction.region_lower;
        let upper = self.extraction.region_upper;
        if lower.iter().zip(upper.iter()).any(|(l, u)| l > u) {
            return Err(ConfigError::Invalid {
                field: "extraction.region_upper",
                reason: format!("{upper:?} is below region_lower {lower:?}"),
            });
        }
        Ok(())
    }

    fn read(config_path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ReadError {
                path: config_path.to_path_buf(),
                source,
            })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
