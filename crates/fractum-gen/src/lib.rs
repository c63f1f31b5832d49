//! Procedural generation core: L-system fractal curves, midpoint-displacement
//! terrain, composite Bézier splines, and terrain coloring.

mod color;
mod height_grid;
mod midpoint;
mod random;
mod spline;

pub mod lsystem;

pub use color::{Band, ColorScheme, ENHANCED_BANDS, Rgb, terrain_color};
pub use height_grid::HeightGrid;
pub use lsystem::{Bounds, Grammar, GrammarError, LSystem, Preset, Segment, TurtlePath};
pub use midpoint::{DEFAULT_ROUGHNESS, HeightmapError, MidpointDisplacement};
pub use random::{RandomStream, det_cos, det_sin};
pub use spline::{BezierSpline, DEFAULT_CURVE_SAMPLES, PointKind, SplineError, cubic_bezier};
