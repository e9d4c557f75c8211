//! Fills a paged volume with simplex terrain and extracts its surface at
//! every configured level of detail.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p strata-demo -- --level 1 --size 128`.

mod terrain;

use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use glam::IVec3;
use strata_config::{CliArgs, Config, default_config_dir};
use strata_mesh::{Mesh, extract_decimated_surface, step_size};
use strata_volume::{GeneratorPager, PagedVolume, Region, VolumeSettings};
use tracing::{error, info, warn};

use crate::terrain::Terrain;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let Some(config_dir) = args.config.clone().or_else(default_config_dir) else {
        eprintln!("No config directory available, pass --config");
        return ExitCode::FAILURE;
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    strata_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let terrain = Terrain::new(config.terrain.clone());
    let pager = GeneratorPager::new(move |p: IVec3| terrain.voxel_at(p));

    let bounds = Region::from_size(IVec3::ZERO, IVec3::splat(config.volume.size));
    let settings = VolumeSettings {
        chunk_power: config.volume.chunk_power,
        max_resident_chunks: config.volume.max_resident_chunks,
    };
    let volume: PagedVolume<u8> = PagedVolume::from_config(bounds, &settings, pager)?;
    info!(
        size = config.volume.size,
        chunk_side = volume.chunk_side_length(),
        max_resident = settings.max_resident_chunks,
        "volume ready"
    );

    let region = Region::new(
        IVec3::from_array(config.extraction.region_lower),
        IVec3::from_array(config.extraction.region_upper),
    );

    let mut mesh = Mesh::<u32>::new();
    for &level in &config.extraction.levels {
        let start = Instant::now();
        extract_decimated_surface(&volume, level, region, &mut mesh)?;
        let elapsed = start.elapsed();

        if mesh.is_empty() {
            warn!(level, ?region, "no surface in region");
            continue;
        }

        info!(
            level,
            step = step_size(level),
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            offset = ?mesh.offset(),
            resident_chunks = volume.resident_chunk_count(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "extracted surface"
        );
    }

    Ok(())
}
