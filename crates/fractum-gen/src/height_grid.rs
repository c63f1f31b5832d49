//! Square heightmap storage produced by the diamond-square generator.

use serde::Serialize;

use crate::color::{ColorScheme, Rgb, terrain_color};

/// A square grid of heights stored row-major, `size × size` cells.
///
/// The generator never normalizes; use [`HeightGrid::normalized`] or
/// [`HeightGrid::colorize`] to map onto `[0, 1]` by the observed range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HeightGrid {
    size: usize,
    cells: Vec<f64>,
}

impl HeightGrid {
    /// An all-zero grid.
    ///
    /// # Panics
    ///
    /// Panics if `size * size` cells cannot be addressed; check
    /// [`HeightGrid::is_valid_size`] first.
    pub fn flat(size: usize) -> Self {
        Self {
            size,
            cells: vec![0.0; size * size],
        }
    }

    /// Returns true when `size` has the form `2^k + 1` and a `size × size`
    /// grid of `f64` fits in the address space.
    pub fn is_valid_size(size: usize) -> bool {
        size >= 2 && (size - 1).is_power_of_two() && Self::cell_bytes(size).is_some()
    }

    fn cell_bytes(size: usize) -> Option<usize> {
        size.checked_mul(size)?
            .checked_mul(std::mem::size_of::<f64>())
            .filter(|&bytes| bytes <= isize::MAX as usize)
    }

    /// Grid side for `k` levels of subdivision: `2^k + 1`.
    pub fn size_for_detail(k: u32) -> usize {
        (1usize << k) + 1
    }

    /// Side length in cells.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Height at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `x` or `y` is `>= size`.
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.cells[y * self.size + x]
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: f64) {
        self.cells[y * self.size + x] = value;
    }

    /// One row of the grid.
    ///
    /// # Panics
    ///
    /// Panics if `y >= size`.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.cells[y * self.size..(y + 1) * self.size]
    }

    /// Iterate over rows from `y = 0` upward.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.size.max(1))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    /// Observed `(min, max)` over every cell.
    pub fn min_max(&self) -> (f64, f64) {
        self.cells
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Cells rescaled to `[0, 1]` by the observed range.
    ///
    /// A flat grid maps every cell to `0.0`.
    pub fn normalized(&self) -> Vec<f64> {
        let (lo, hi) = self.min_max();
        let range = hi - lo;
        if range <= 0.0 {
            return vec![0.0; self.cells.len()];
        }
        self.cells.iter().map(|&v| (v - lo) / range).collect()
    }

    /// Terrain color of every cell, row-major.
    pub fn colorize(&self, scheme: ColorScheme) -> Vec<Rgb> {
        self.normalized()
            .into_iter()
            .map(|n| terrain_color(n, scheme))
            .collect()
    }
}
