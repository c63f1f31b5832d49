//! Composite cubic Bézier spline with structural edit operations.
//!
//! Control points are grouped into overlapping windows `[0..=3]`, `[3..=6]`,
//! `[6..=9]`, ... Each window is one cubic segment and consecutive segments
//! share their boundary point. Points at indices divisible by three are
//! anchors; the rest are handles. Trailing points that do not complete a
//! window belong to no segment until more points are added.

use glam::DVec2;
use serde::Serialize;

/// Samples per segment used by [`BezierSpline::all_curves`].
pub const DEFAULT_CURVE_SAMPLES: usize = 100;

/// First segment seeded by [`BezierSpline::add_segment`] on an empty spline.
const INITIAL_SEGMENT: [DVec2; 4] = [
    DVec2::new(0.1, 0.1),
    DVec2::new(0.2, 0.3),
    DVec2::new(0.3, 0.2),
    DVec2::new(0.4, 0.4),
];

/// Offsets from the current last point for the three points of an appended segment.
const SEGMENT_OFFSETS: [DVec2; 3] = [
    DVec2::new(0.1, 0.1),
    DVec2::new(0.2, 0.0),
    DVec2::new(0.3, 0.1),
];

/// Rejected spline edits. The spline is left untouched when one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    /// The index does not name an existing control point.
    #[error("control point index {index} out of range for {len} point(s)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Removing this interior anchor would shift every later segment window.
    #[error("control point {index} is an interior segment anchor and cannot be removed")]
    ProtectedBoundary { index: usize },

    /// There is no segment to remove.
    #[error("spline has no segments")]
    NoSegments,
}

/// Role of a control point in the segment grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    /// Segment boundary, index divisible by three.
    Anchor,
    /// Tangent handle inside a segment.
    Handle,
    /// The last control point, when it is not an anchor.
    End,
}

/// A chain of cubic Bézier segments sharing endpoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BezierSpline {
    control_points: Vec<DVec2>,
    segments: Vec<[DVec2; 4]>,
}

impl BezierSpline {
    /// An empty spline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one control point.
    pub fn add_control_point(&mut self, point: DVec2) {
        self.control_points.push(point);
        self.update_segments();
    }

    /// Remove the control point at `index`.
    ///
    /// # Errors
    ///
    /// [`SplineError::IndexOutOfRange`] for a missing index, and
    /// [`SplineError::ProtectedBoundary`] for an anchor that is neither the
    /// first nor the last point while at least four points exist.
    pub fn remove_control_point(&mut self, index: usize) -> Result<(), SplineError> {
        let len = self.control_points.len();
        if index >= len {
            return Err(SplineError::IndexOutOfRange { index, len });
        }
        if len >= 4 && index % 3 == 0 && index != 0 && index != len - 1 {
            return Err(SplineError::ProtectedBoundary { index });
        }

        self.control_points.remove(index);
        self.update_segments();
        Ok(())
    }

    /// Replace the control point at `index`.
    ///
    /// # Errors
    ///
    /// [`SplineError::IndexOutOfRange`] for a missing index.
    pub fn move_control_point(&mut self, index: usize, point: DVec2) -> Result<(), SplineError> {
        let len = self.control_points.len();
        let slot = self
            .control_points
            .get_mut(index)
            .ok_or(SplineError::IndexOutOfRange { index, len })?;
        *slot = point;
        self.update_segments();
        Ok(())
    }

    /// Extend the chain by one segment.
    ///
    /// An empty spline is seeded with a default four-point segment; otherwise
    /// three points are appended at fixed offsets from the current last point.
    pub fn add_segment(&mut self) {
        match self.control_points.last().copied() {
            None => self.control_points.extend(INITIAL_SEGMENT),
            Some(last) => self
                .control_points
                .extend(SEGMENT_OFFSETS.iter().map(|offset| last + *offset)),
        }
        self.update_segments();
    }

    /// Drop the last segment's three trailing points, keeping its start anchor.
    ///
    /// # Errors
    ///
    /// [`SplineError::NoSegments`] when no segment exists.
    pub fn remove_last_segment(&mut self) -> Result<(), SplineError> {
        if self.segments.is_empty() {
            return Err(SplineError::NoSegments);
        }
        let keep = self.control_points.len() - 3;
        self.control_points.truncate(keep);
        self.update_segments();
        Ok(())
    }

    /// Sampled curve of every segment, [`DEFAULT_CURVE_SAMPLES`] points each.
    pub fn all_curves(&self) -> Vec<Vec<DVec2>> {
        self.all_curves_with(DEFAULT_CURVE_SAMPLES)
    }

    /// Sampled curve of every segment with `samples` points each.
    pub fn all_curves_with(&self, samples: usize) -> Vec<Vec<DVec2>> {
        self.segments
            .iter()
            .map(|&[p0, p1, p2, p3]| cubic_bezier(p0, p1, p2, p3, samples))
            .collect()
    }

    /// Snapshot of the control points.
    pub fn control_points(&self) -> &[DVec2] {
        &self.control_points
    }

    /// Current four-point segment windows.
    pub fn segments(&self) -> &[[DVec2; 4]] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Role of the point at `index`, or `None` if it does not exist.
    pub fn point_kind(&self, index: usize) -> Option<PointKind> {
        let len = self.control_points.len();
        if index >= len {
            None
        } else if index % 3 == 0 {
            Some(PointKind::Anchor)
        } else if index == len - 1 {
            Some(PointKind::End)
        } else {
            Some(PointKind::Handle)
        }
    }

    /// Remove every point and segment.
    pub fn clear(&mut self) {
        self.control_points.clear();
        self.segments.clear();
    }

    fn update_segments(&mut self) {
        self.segments = self
            .control_points
            .windows(4)
            .step_by(3)
            .map(|w| [w[0], w[1], w[2], w[3]])
            .collect();
    }
}

/// Sample a cubic Bézier curve at `samples` evenly spaced `t` in `[0, 1]`.
///
/// Both ends are included; a single sample evaluates `t = 0`.
pub fn cubic_bezier(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, samples: usize) -> Vec<DVec2> {
    let denominator = samples.saturating_sub(1).max(1) as f64;
    (0..samples)
        .map(|i| {
            let t = i as f64 / denominator;
            let u = 1.0 - t;
            p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
        })
        .collect()
}
