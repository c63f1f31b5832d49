//! `fractum`: run one procedural generator and print its output as JSON.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p fractum-cli -- lsystem --preset koch_curve --iterations 3`.
//! Logs go to stderr; stdout carries only the JSON report.

mod report;

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fractum_config::{CliArgs, Config, ConfigError, default_config_dir};
use fractum_gen::{
    BezierSpline, Grammar, GrammarError, HeightmapError, LSystem, MidpointDisplacement,
    RandomStream,
};
use serde::Serialize;
use tracing::{error, info};

use crate::report::{HeightmapReport, LSystemReport, ProfileReport, SplineReport};

#[derive(Parser, Debug)]
#[command(name = "fractum", version, about = "Procedural fractal, terrain and spline generator")]
struct Cli {
    #[command(flatten)]
    args: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand an L-system and report its string and bounds.
    Lsystem {
        /// Grammar text file (overrides the preset).
        #[arg(long)]
        grammar: Option<PathBuf>,

        /// Also emit every drawn line segment.
        #[arg(long)]
        trace: bool,
    },
    /// Generate a 1D midpoint displacement profile.
    Profile,
    /// Generate a diamond-square heightmap.
    Heightmap {
        /// Attach a terrain color to every cell.
        #[arg(long)]
        colorize: bool,
    },
    /// Build a composite Bézier spline and sample its curves.
    Spline {
        /// Number of segments to build.
        #[arg(long)]
        segments: Option<usize>,

        /// Samples per segment.
        #[arg(long)]
        samples: Option<usize>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read grammar {}: {source}", .path.display())]
    ReadGrammar {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Heightmap(#[from] HeightmapError),

    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
}

fn main() {
    let cli = Cli::parse();

    // Resolve config directory
    let config_dir = cli
        .args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".fractum"));

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&cli.args);

    let log_dir = config_dir.join("logs");
    fractum_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    if let Err(e) = run(&cli.command, &config) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(command: &Command, config: &Config) -> Result<(), CliError> {
    config.validate()?;
    let stream = RandomStream::from_optional_seed(config.seed);
    info!(seed = stream.seed(), "Random stream ready");

    match command {
        Command::Lsystem { grammar, trace } => {
            let path = grammar.as_ref().or(config.lsystem.grammar_path.as_ref());
            emit(&run_lsystem(config, path, *trace, stream)?)
        }
        Command::Profile => emit(&run_profile(config, stream)),
        Command::Heightmap { colorize } => emit(&run_heightmap(config, *colorize, stream)?),
        Command::Spline { segments, samples } => {
            let segments = segments.unwrap_or(config.spline.segments);
            let samples = samples.unwrap_or(config.spline.samples_per_segment);
            emit(&run_spline(segments, samples))
        }
    }
}

fn load_grammar(config: &Config, path: Option<&PathBuf>) -> Result<Grammar, CliError> {
    let grammar = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadGrammar {
                path: path.clone(),
                source,
            })?;
            info!(path = %path.display(), "Loaded grammar file");
            Grammar::parse(&text)?
        }
        None => {
            info!(preset = config.lsystem.preset.name(), "Using bundled grammar");
            Grammar::preset(config.lsystem.preset)
        }
    };
    Ok(match config.lsystem.step_length {
        Some(step) => grammar.with_step_length(step),
        None => grammar,
    })
}

fn run_lsystem(
    config: &Config,
    grammar_path: Option<&PathBuf>,
    trace: bool,
    stream: RandomStream,
) -> Result<LSystemReport, CliError> {
    let seed = stream.seed();
    let grammar = load_grammar(config, grammar_path)?;
    let grammar_text = grammar.to_string();
    let mut lsys = LSystem::new(grammar, stream);
    lsys.set_randomness(config.lsystem.randomness);

    let iterations = config.lsystem.iterations;
    let expanded = lsys.expand(iterations);

    // A single walk gives bounds that match the drawn segments exactly.
    let (bounds, path) = if trace {
        let path = lsys.trace(&expanded)?;
        (path.bounds, Some(path))
    } else {
        (lsys.compute_bounds(&expanded)?, None)
    };
    info!(
        length = expanded.len(),
        width = bounds.width(),
        height = bounds.height(),
        "L-system expanded"
    );

    let report = LSystemReport {
        seed,
        grammar: grammar_text,
        iterations,
        randomness: lsys.randomness(),
        length: expanded.len(),
        expanded,
        bounds: bounds.into(),
        segments: None,
    };
    Ok(match path {
        Some(path) => report.with_path(&path),
        None => report,
    })
}

fn run_profile(config: &Config, stream: RandomStream) -> ProfileReport {
    let seed = stream.seed();
    let mc = &config.midpoint;
    let mut md = MidpointDisplacement::new(mc.roughness, stream);
    let profile = md.generate_1d(mc.iterations, mc.start_height, mc.end_height);
    info!(points = profile.len(), "Profile generated");
    ProfileReport::new(seed, mc.roughness, mc.iterations, &profile)
}

fn run_heightmap(
    config: &Config,
    colorize: bool,
    stream: RandomStream,
) -> Result<HeightmapReport, CliError> {
    let seed = stream.seed();
    let mc = &config.midpoint;
    let mut md = MidpointDisplacement::new(mc.roughness, stream);
    let grid = md.generate_2d(mc.grid_size, mc.iterations, mc.min_height, mc.max_height)?;
    let (lo, hi) = grid.min_max();
    info!(size = grid.size(), min = lo, max = hi, "Heightmap generated");

    let report = HeightmapReport::new(seed, mc.roughness, &grid);
    Ok(if colorize {
        report.with_colors(grid.size(), grid.colorize(mc.color_scheme))
    } else {
        report
    })
}

fn run_spline(segments: usize, samples: usize) -> SplineReport {
    let mut spline = BezierSpline::new();
    for _ in 0..segments {
        spline.add_segment();
    }
    info!(
        segments = spline.segment_count(),
        points = spline.control_points().len(),
        "Spline built"
    );
    SplineReport::new(&spline, samples)
}

fn emit<T: Serialize>(report: &T) -> Result<(), CliError> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, report)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn seeded_config() -> Config {
        let mut config = Config::default();
        config.seed = Some(42);
        config
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::try_parse_from([
            "fractum",
            "lsystem",
            "--trace",
            "--iterations",
            "2",
            "--seed",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.args.iterations, Some(2));
        assert_eq!(cli.args.seed, Some(5));
        assert!(matches!(cli.command, Command::Lsystem { trace: true, .. }));
    }

    #[test]
    fn test_lsystem_report_for_koch_preset() {
        let mut config = seeded_config();
        config.lsystem.iterations = 1;
        let report = run_lsystem(&config, None, true, RandomStream::seeded(42)).unwrap();

        assert_eq!(report.expanded, "F+F--F+F");
        assert_eq!(report.length, 8);
        assert_eq!(report.segments.as_ref().map(Vec::len), Some(4));
        assert_eq!(report.seed, 42);
    }

    #[test]
    fn test_step_length_override_scales_bounds() {
        let mut config = seeded_config();
        config.lsystem.iterations = 0;
        config.lsystem.step_length = Some(2.0);
        let report = run_lsystem(&config, None, false, RandomStream::seeded(1)).unwrap();
        assert!((report.bounds.width - 2.0).abs() < 1e-9, "width {}", report.bounds.width);
    }

    #[test]
    fn test_missing_grammar_file_is_reported() {
        let config = seeded_config();
        let path = PathBuf::from("/nonexistent/grammar.txt");
        let result = run_lsystem(&config, Some(&path), false, RandomStream::seeded(1));
        assert!(matches!(result, Err(CliError::ReadGrammar { .. })));
    }

    #[test]
    fn test_profile_endpoints_follow_config() {
        let mut config = seeded_config();
        config.midpoint.iterations = 3;
        config.midpoint.start_height = 0.25;
        config.midpoint.end_height = 0.75;
        let report = run_profile(&config, RandomStream::seeded(42));
        assert_eq!(report.points.len(), 9);
        assert_eq!(report.points[0], [0.0, 0.25]);
        assert_eq!(report.points[8], [1.0, 0.75]);
    }

    #[test]
    fn test_heightmap_rejects_invalid_size() {
        let mut config = seeded_config();
        config.midpoint.grid_size = 10;
        let result = run_heightmap(&config, false, RandomStream::seeded(42));
        assert!(matches!(result, Err(CliError::Heightmap(_))));
    }

    #[test]
    fn test_heightmap_colorized() {
        let mut config = seeded_config();
        config.midpoint.grid_size = 9;
        let report = run_heightmap(&config, true, RandomStream::seeded(42)).unwrap();
        assert_eq!(report.heights.len(), 9);
        assert_eq!(report.colors.as_ref().map(Vec::len), Some(9));
    }

    #[test]
    fn test_spline_segments() {
        let report = run_spline(3, 10);
        assert_eq!(report.control_points.len(), 10);
        assert_eq!(report.curves.len(), 3);
        assert!(report.curves.iter().all(|c| c.len() == 10));
        assert!(run_spline(0, 10).curves.is_empty());
    }
}
