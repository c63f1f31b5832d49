//! Command-line overrides for the persisted configuration.

use std::path::PathBuf;

use clap::Args;
use fractum_gen::{ColorScheme, Preset};

use crate::Config;

/// Global command-line options shared by every `fractum` subcommand.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Seed for all generators (random when unset).
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// L-system rewrite passes.
    #[arg(long, global = true)]
    pub iterations: Option<u32>,

    /// L-system randomness (0.0 - 1.0).
    #[arg(long, global = true)]
    pub randomness: Option<f64>,

    /// L-system preset (koch_curve, sierpinski_triangle, sierpinski_carpet).
    #[arg(long, global = true, value_parser = parse_preset)]
    pub preset: Option<Preset>,

    /// Midpoint displacement roughness.
    #[arg(long, global = true)]
    pub roughness: Option<f64>,

    /// Heightmap side length (2^k + 1).
    #[arg(long, global = true)]
    pub grid_size: Option<usize>,

    /// Terrain color scheme (simple, enhanced).
    #[arg(long, global = true, value_parser = parse_color_scheme)]
    pub color_scheme: Option<ColorScheme>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    Preset::from_name(s).ok_or_else(|| {
        let names: Vec<_> = Preset::ALL.iter().map(|p| p.name()).collect();
        format!("unknown preset `{s}`, expected one of: {}", names.join(", "))
    })
}

fn parse_color_scheme(s: &str) -> Result<ColorScheme, String> {
    match s {
        "simple" => Ok(ColorScheme::Simple),
        "enhanced" => Ok(ColorScheme::Enhanced),
        _ => Err(format!("unknown color scheme `{s}`, expected simple or enhanced")),
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if let Some(n) = args.iterations {
            self.lsystem.iterations = n;
        }
        if let Some(r) = args.randomness {
            self.lsystem.randomness = r;
        }
        if let Some(preset) = args.preset {
            self.lsystem.preset = preset;
        }
        if let Some(r) = args.roughness {
            self.midpoint.roughness = r;
        }
        if let Some(size) = args.grid_size {
            self.midpoint.grid_size = size;
        }
        if let Some(scheme) = args.color_scheme {
            self.midpoint.color_scheme = scheme;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: CliArgs,
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some(99),
            roughness: Some(0.4),
            color_scheme: Some(ColorScheme::Simple),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.seed, Some(99));
        assert_eq!(config.midpoint.roughness, 0.4);
        assert_eq!(config.midpoint.color_scheme, ColorScheme::Simple);
        // Non-overridden fields retain defaults
        assert_eq!(config.lsystem.iterations, 4);
        assert_eq!(config.midpoint.grid_size, 33);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_enum_values() {
        let harness = Harness::try_parse_from([
            "fractum",
            "--preset",
            "sierpinski_triangle",
            "--color-scheme",
            "enhanced",
            "--grid-size",
            "65",
        ])
        .unwrap();
        assert_eq!(harness.args.preset, Some(Preset::SierpinskiTriangle));
        assert_eq!(harness.args.color_scheme, Some(ColorScheme::Enhanced));
        assert_eq!(harness.args.grid_size, Some(65));
    }

    #[test]
    fn test_cli_rejects_unknown_preset() {
        let result = Harness::try_parse_from(["fractum", "--preset", "dragon"]);
        assert!(result.is_err());
    }
}
