//! Configuration for the Fractum generators.
//!
//! Settings persist to disk as a RON file, tolerate missing and unknown
//! fields, and accept command-line overrides via clap.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE_NAME, Config, DebugConfig, LSystemConfig, MidpointConfig, SplineConfig,
    default_config_dir,
};
pub use error::ConfigError;
