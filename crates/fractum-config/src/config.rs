//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use fractum_gen::{ColorScheme, DEFAULT_CURVE_SAMPLES, DEFAULT_ROUGHNESS, HeightGrid, Preset};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the persisted configuration inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ron";

/// Platform config directory for Fractum, e.g. `~/.config/fractum`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("fractum"))
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Seed for every generator; `None` draws a fresh seed per run.
    pub seed: Option<u64>,
    /// L-system settings.
    pub lsystem: LSystemConfig,
    /// Midpoint displacement and heightmap settings.
    pub midpoint: MidpointConfig,
    /// Bézier spline settings.
    pub spline: SplineConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// L-system configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LSystemConfig {
    /// Bundled grammar used when no grammar file is given.
    pub preset: Preset,
    /// Grammar text file; takes precedence over `preset`.
    pub grammar_path: Option<PathBuf>,
    /// Number of rewrite passes.
    pub iterations: u32,
    /// Rewrite-skip probability and turn jitter amplitude (0.0 - 1.0).
    pub randomness: f64,
    /// Overrides the grammar's step length when set.
    pub step_length: Option<f64>,
}

/// Midpoint displacement configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MidpointConfig {
    /// Displacement amplitude.
    pub roughness: f64,
    /// Subdivision passes for 1D profiles.
    pub iterations: u32,
    /// Profile height at x = 0.
    pub start_height: f64,
    /// Profile height at x = 1.
    pub end_height: f64,
    /// Heightmap side length, must be 2^k + 1.
    pub grid_size: usize,
    /// Lower bound for heightmap corner values.
    pub min_height: f64,
    /// Upper bound for heightmap corner values.
    pub max_height: f64,
    /// Terrain coloring policy.
    pub color_scheme: ColorScheme,
}

/// Bézier spline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SplineConfig {
    /// Curve samples per segment.
    pub samples_per_segment: usize,
    /// Segments created by the demo spline.
    pub segments: usize,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for LSystemConfig {
    fn default() -> Self {
        Self {
            preset: Preset::KochCurve,
            grammar_path: None,
            iterations: 4,
            randomness: 0.0,
            step_length: None,
        }
    }
}

impl Default for MidpointConfig {
    fn default() -> Self {
        Self {
            roughness: DEFAULT_ROUGHNESS,
            iterations: 6,
            start_height: 0.0,
            end_height: 0.0,
            grid_size: 33,
            min_height: 0.0,
            max_height: 1.0,
            color_scheme: ColorScheme::Enhanced,
        }
    }
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            samples_per_segment: DEFAULT_CURVE_SAMPLES,
            segments: 2,
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

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
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
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(2)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file: returns `Some(new_config)` if it changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the generators cannot run with.
    ///
    /// Out-of-range randomness is tolerated here; the L-system engine
    /// warns about it at use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !HeightGrid::is_valid_size(self.midpoint.grid_size) {
            return Err(ConfigError::Invalid {
                field: "midpoint.grid_size",
                reason: format!("{} is not 2^k + 1 or is too large", self.midpoint.grid_size),
            });
        }
        if self.midpoint.min_height > self.midpoint.max_height {
            return Err(ConfigError::Invalid {
                field: "midpoint.min_height",
                reason: format!(
                    "{} exceeds max_height {}",
                    self.midpoint.min_height, self.midpoint.max_height
                ),
            });
        }
        if !self.midpoint.roughness.is_finite() {
            return Err(ConfigError::Invalid {
                field: "midpoint.roughness",
                reason: "must be finite".to_string(),
            });
        }
        if let Some(step) = self.lsystem.step_length.filter(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ConfigError::Invalid {
                field: "lsystem.step_length",
                reason: format!("{step} is not a positive length"),
            });
        }
        Ok(())
    }
}
