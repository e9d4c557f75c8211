//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Strata command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "strata", about = "Paged voxel volume surface extraction")]
pub struct CliArgs {
    /// Extract a single level of detail instead of the configured list.
    #[arg(long)]
    pub level: Option<u8>,

    /// Chunk side length as a power of two.
    #[arg(long)]
    pub chunk_power: Option<u8>,

    /// Maximum number of resident chunks.
    #[arg(long)]
    pub max_chunks: Option<usize>,

    /// Side length of the volume in voxels.
    #[arg(long)]
    pub size: Option<i32>,

    /// Terrain noise seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(level) = args.level {
            self.extraction.levels = vec![level];
        }
        if let Some(power) = args.chunk_power {
            self.volume.chunk_power = power;
        }
        if let Some(max) = args.max_chunks {
            self.volume.max_resident_chunks = max;
        }
        if let Some(size) = args.size {
            self.volume.size = size;
        }
        if let Some(seed) = args.seed {
            self.terrain.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}
