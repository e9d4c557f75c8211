//! Configuration for Strata tools.
//!
//! Settings persist to disk as a RON file. CLI arguments parsed with clap
//! override loaded values, and unknown or missing fields fall back to
//! defaults so old config files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, ExtractionConfig, TerrainConfig, VolumeConfig, default_config_dir,
};
pub use error::ConfigError;
