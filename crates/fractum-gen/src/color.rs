//! Terrain color mapping: normalized height `[0, 1]` to RGB.
//!
//! Two policies are available. [`ColorScheme::Enhanced`] interpolates between
//! eight biome bands, deep ocean to snow, and is continuous everywhere.
//! [`ColorScheme::Simple`] uses four flat-hued bands (water, plains, hills,
//! mountains) whose brightness follows the height.

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Which banding policy [`terrain_color`] applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Water / plains / hills / mountains.
    Simple,
    /// Eight interpolated biome bands.
    #[default]
    Enhanced,
}

/// A named reference color placed at a normalized height.
#[derive(Clone, Copy, Debug)]
pub struct Band {
    pub name: &'static str,
    pub start: f64,
    pub color: Rgb,
}

/// Reference bands of the enhanced scheme, ordered by `start`.
///
/// Between two adjacent bands each channel is interpolated linearly; the
/// first band starts at `0.0` and the last at `1.0`.
pub const ENHANCED_BANDS: [Band; 8] = [
    Band { name: "deep_ocean", start: 0.00, color: Rgb::new(0, 0, 128) },
    Band { name: "shallow_ocean", start: 0.25, color: Rgb::new(30, 80, 200) },
    Band { name: "beach", start: 0.32, color: Rgb::new(220, 200, 130) },
    Band { name: "plains", start: 0.38, color: Rgb::new(100, 180, 60) },
    Band { name: "forest", start: 0.50, color: Rgb::new(30, 120, 30) },
    Band { name: "hills", start: 0.65, color: Rgb::new(130, 110, 60) },
    Band { name: "mountains", start: 0.80, color: Rgb::new(120, 110, 100) },
    Band { name: "snow", start: 1.00, color: Rgb::new(250, 250, 250) },
];

/// Map a normalized height to a terrain color.
///
/// Inputs outside `[0, 1]` (and NaN) are clamped to the nearest end band.
pub fn terrain_color(normalized: f64, scheme: ColorScheme) -> Rgb {
    let n = if normalized.is_nan() {
        0.0
    } else {
        normalized.clamp(0.0, 1.0)
    };
    match scheme {
        ColorScheme::Simple => simple_color(n),
        ColorScheme::Enhanced => enhanced_color(n),
    }
}

fn enhanced_color(n: f64) -> Rgb {
    for pair in ENHANCED_BANDS.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        if n <= upper.start {
            let t = (n - lower.start) / (upper.start - lower.start);
            return lerp(lower.color, upper.color, t);
        }
    }
    ENHANCED_BANDS[ENHANCED_BANDS.len() - 1].color
}

fn simple_color(n: f64) -> Rgb {
    let shade = (n * 200.0) as u8;
    if n < 0.3 {
        // Water
        Rgb::new(0, 0, (n * 200.0 + 55.0) as u8)
    } else if n < 0.5 {
        // Plains
        Rgb::new(34, (n * 200.0 + 55.0) as u8, 34)
    } else if n < 0.7 {
        // Hills
        Rgb::new(139, shade, 19)
    } else {
        // Mountains
        Rgb::new(shade, shade, shade)
    }
}

fn lerp(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb::new(channel(a.r, b.r), channel(a.g, b.g), channel(a.b, b.b))
}
