//! Midpoint displacement: 1D terrain profiles by recursive subdivision and
//! 2D heightmaps by the diamond-square algorithm.
//!
//! Both generators offset each new midpoint by `uniform(-1, 1) * roughness *
//! scale`, where `scale` shrinks every pass so later passes only add fine
//! detail.

use glam::DVec2;

use crate::height_grid::HeightGrid;
use crate::random::RandomStream;

/// Roughness used when none is configured.
pub const DEFAULT_ROUGHNESS: f64 = 0.7;

/// Errors returned by heightmap generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HeightmapError {
    /// Diamond-square needs a side length of the form `2^k + 1` whose grid
    /// fits in memory.
    #[error("heightmap size {size} is not of the form 2^k + 1 or is too large")]
    InvalidSize { size: usize },
}

/// Midpoint displacement generator owning its random stream.
///
/// Successive calls continue the same stream, so two calls on one instance
/// differ while two instances seeded alike replay each other.
pub struct MidpointDisplacement {
    roughness: f64,
    stream: RandomStream,
}

impl MidpointDisplacement {
    pub fn new(roughness: f64, stream: RandomStream) -> Self {
        Self { roughness, stream }
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    /// Generate a profile from `(0, start_height)` to `(1, end_height)`.
    ///
    /// Pass `p` inserts a displaced midpoint between every adjacent pair with
    /// amplitude `roughness / 2^(p / 2)`. The result has `2^iterations + 1`
    /// points with non-decreasing x.
    pub fn generate_1d(&mut self, iterations: u32, start_height: f64, end_height: f64) -> Vec<DVec2> {
        let mut points = vec![DVec2::new(0.0, start_height), DVec2::new(1.0, end_height)];

        for pass in 0..iterations {
            let scale = 1.0 / 2f64.powf(pass as f64 * 0.5);
            let mut next = Vec::with_capacity(points.len() * 2 - 1);

            for pair in points.windows(2) {
                let (left, right) = (pair[0], pair[1]);
                let mut mid = (left + right) * 0.5;
                mid.y += self.stream.signed_unit() * self.roughness * scale;
                next.push(left);
                next.push(mid);
            }
            // `points` always holds at least the two endpoints.
            next.push(points[points.len() - 1]);
            points = next;
        }

        tracing::debug!(
            iterations,
            points = points.len(),
            roughness = self.roughness,
            "generated 1d profile"
        );
        points
    }

    /// Generate a `size × size` heightmap with the diamond-square algorithm.
    ///
    /// Corners are drawn uniformly from `[min_height, max_height]`; displaced
    /// values may leave that range. The number of passes is `log2(size - 1)`,
    /// fixed by `size`; `iterations` is accepted for call compatibility and
    /// only reported in the generation event.
    ///
    /// # Errors
    ///
    /// Returns [`HeightmapError::InvalidSize`] before allocating if `size` is
    /// not `2^k + 1` or `size × size` cells cannot be addressed.
    pub fn generate_2d(
        &mut self,
        size: usize,
        iterations: u32,
        min_height: f64,
        max_height: f64,
    ) -> Result<HeightGrid, HeightmapError> {
        if !HeightGrid::is_valid_size(size) {
            return Err(HeightmapError::InvalidSize { size });
        }

        let mut grid = HeightGrid::flat(size);
        let last = size - 1;
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            grid.set(x, y, self.stream.uniform(min_height, max_height));
        }

        let mut step = last;
        let mut scale = 1.0;
        let mut passes = 0u32;

        while step > 1 {
            let half = step / 2;
            self.diamond_step(&mut grid, step, scale);
            self.square_step(&mut grid, step, half, scale);
            step /= 2;
            scale *= 0.5;
            passes += 1;
        }

        tracing::debug!(size, iterations, passes, roughness = self.roughness, "generated heightmap");
        Ok(grid)
    }

    /// Set each step-aligned cell center to the mean of its four corners plus jitter.
    fn diamond_step(&mut self, grid: &mut HeightGrid, step: usize, scale: f64) {
        let half = step / 2;
        let last = grid.size() - 1;
        for y in (0..last).step_by(step) {
            for x in (0..last).step_by(step) {
                let avg = (grid.get(x, y)
                    + grid.get(x + step, y)
                    + grid.get(x, y + step)
                    + grid.get(x + step, y + step))
                    / 4.0;
                let value = avg + self.jitter(scale);
                grid.set(x + half, y + half, value);
            }
        }
    }

    /// Set each edge midpoint to the mean of its in-grid axis neighbours plus jitter.
    fn square_step(&mut self, grid: &mut HeightGrid, step: usize, half: usize, scale: f64) {
        let size = grid.size();
        for y in (0..size).step_by(half) {
            for x in ((y + half) % step..size).step_by(step) {
                let mut total = 0.0;
                let mut count = 0u32;
                if y >= half {
                    total += grid.get(x, y - half);
                    count += 1;
                }
                if y + half < size {
                    total += grid.get(x, y + half);
                    count += 1;
                }
                if x >= half {
                    total += grid.get(x - half, y);
                    count += 1;
                }
                if x + half < size {
                    total += grid.get(x + half, y);
                    count += 1;
                }
                if count > 0 {
                    let value = total / count as f64 + self.jitter(scale);
                    grid.set(x, y, value);
                }
            }
        }
    }

    #[inline]
    fn jitter(&mut self, scale: f64) -> f64 {
        self.stream.signed_unit() * scale * self.roughness
    }
}
