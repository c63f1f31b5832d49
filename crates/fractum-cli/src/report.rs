//! JSON-serializable generator outputs.
//!
//! Points are emitted as `[x, y]` pairs so external renderers need no
//! knowledge of the vector type used internally.

use fractum_gen::{BezierSpline, Bounds, HeightGrid, PointKind, Rgb, TurtlePath};
use glam::DVec2;
use serde::Serialize;

type Point = [f64; 2];

fn point(p: DVec2) -> Point {
    p.to_array()
}

fn points(ps: &[DVec2]) -> Vec<Point> {
    ps.iter().copied().map(point).collect()
}

#[derive(Debug, Serialize)]
pub struct BoundsReport {
    pub min: Point,
    pub max: Point,
    pub width: f64,
    pub height: f64,
}

impl From<Bounds> for BoundsReport {
    fn from(bounds: Bounds) -> Self {
        Self {
            min: point(bounds.min),
            max: point(bounds.max),
            width: bounds.width(),
            height: bounds.height(),
        }
    }
}

/// Output of `fractum lsystem`.
#[derive(Debug, Serialize)]
pub struct LSystemReport {
    pub seed: u64,
    pub grammar: String,
    pub iterations: u32,
    pub randomness: f64,
    pub length: usize,
    pub expanded: String,
    pub bounds: BoundsReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<[Point; 2]>>,
}

impl LSystemReport {
    pub fn with_path(mut self, path: &TurtlePath) -> Self {
        self.segments = Some(
            path.segments
                .iter()
                .map(|s| [point(s.start), point(s.end)])
                .collect(),
        );
        self
    }
}

/// Output of `fractum profile`.
#[derive(Debug, Serialize)]
pub struct ProfileReport {
    pub seed: u64,
    pub roughness: f64,
    pub iterations: u32,
    pub points: Vec<Point>,
}

impl ProfileReport {
    pub fn new(seed: u64, roughness: f64, iterations: u32, profile: &[DVec2]) -> Self {
        Self {
            seed,
            roughness,
            iterations,
            points: points(profile),
        }
    }
}

/// Output of `fractum heightmap`.
#[derive(Debug, Serialize)]
pub struct HeightmapReport {
    pub seed: u64,
    pub roughness: f64,
    pub size: usize,
    pub min: f64,
    pub max: f64,
    pub heights: Vec<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<Vec<Rgb>>>,
}

impl HeightmapReport {
    pub fn new(seed: u64, roughness: f64, grid: &HeightGrid) -> Self {
        let (min, max) = grid.min_max();
        Self {
            seed,
            roughness,
            size: grid.size(),
            min,
            max,
            heights: grid.rows().map(<[f64]>::to_vec).collect(),
            colors: None,
        }
    }

    pub fn with_colors(mut self, size: usize, colors: Vec<Rgb>) -> Self {
        self.colors = Some(colors.chunks(size.max(1)).map(<[Rgb]>::to_vec).collect());
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ControlPointReport {
    pub point: Point,
    pub kind: PointKind,
}

/// Output of `fractum spline`.
#[derive(Debug, Serialize)]
pub struct SplineReport {
    pub samples_per_segment: usize,
    pub control_points: Vec<ControlPointReport>,
    pub curves: Vec<Vec<Point>>,
}

impl SplineReport {
    pub fn new(spline: &BezierSpline, samples: usize) -> Self {
        let control_points = spline
            .control_points()
            .iter()
            .enumerate()
            .filter_map(|(i, &p)| {
                spline.point_kind(i).map(|kind| ControlPointReport {
                    point: point(p),
                    kind,
                })
            })
            .collect();
        Self {
            samples_per_segment: samples,
            control_points,
            curves: spline
                .all_curves_with(samples)
                .iter()
                .map(|c| points(c))
                .collect(),
        }
    }
}
