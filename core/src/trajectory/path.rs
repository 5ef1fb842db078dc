//! Cubic swim path with arc-length sampling
//!
//! The curve is flattened once into a polyline with cached cumulative
//! lengths, so sampling "x% of the way along" is a binary search plus a lerp
//! and the swim speed stays uniform along the curve regardless of how the
//! control points bunch the parameter.

use glam::Vec2;
use serde::Serialize;

use crate::render::Path2D;

/// Polyline resolution used for arc-length lookup
const FLATTEN_STEPS: usize = 64;

/// Position and direction at some point along a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PathSample {
    pub position: Vec2,
    /// Unit tangent, or `None` on a zero-length path
    pub tangent: Option<Vec2>,
}

impl PathSample {
    /// Heading in degrees derived from the tangent.
    ///
    /// The tangent lives in screen space (y down). Negating y before
    /// `atan2` flips it back to a counter-clockwise-positive angle so the
    /// result matches the heading convention used by [`crate::geometry::offset_point`].
    pub fn heading(&self) -> Option<f32> {
        self.tangent.map(|t| (-t.y).atan2(t.x).to_degrees())
    }
}

/// Cubic Bezier from the fish's current origin toward a touch target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwimPath {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
    #[serde(skip)]
    points: Vec<Vec2>,
    /// `distances[i]` is the arc length from `start` to `points[i]`
    #[serde(skip)]
    distances: Vec<f32>,
}

impl SwimPath {
    pub fn new(start: Vec2, control1: Vec2, control2: Vec2, end: Vec2) -> Self {
        let mut points = Vec::with_capacity(FLATTEN_STEPS + 1);
        let mut distances = Vec::with_capacity(FLATTEN_STEPS + 1);
        points.push(start);
        distances.push(0.0);

        let mut total = 0.0;
        for step in 1..=FLATTEN_STEPS {
            let t = step as f32 / FLATTEN_STEPS as f32;
            let point = cubic_point(start, control1, control2, end, t);
            let Some(&previous) = points.last() else {
                continue;
            };
            let length = previous.distance(point);
            // Skip degenerate pieces so every stored segment has a direction
            if length > f32::EPSILON {
                total += length;
                points.push(point);
                distances.push(total);
            }
        }

        Self {
            start,
            control1,
            control2,
            end,
            points,
            distances,
        }
    }

    /// Approximate arc length of the curve
    pub fn length(&self) -> f32 {
        self.distances.last().copied().unwrap_or(0.0)
    }

    /// Position and tangent at `fraction` of the total arc length
    pub fn sample_at(&self, fraction: f32) -> PathSample {
        if self.points.len() < 2 {
            return PathSample {
                position: self.start,
                tangent: None,
            };
        }

        let target = fraction.clamp(0.0, 1.0) * self.length();
        // First stored point at or beyond the target distance, as a segment end
        let end_index = self
            .distances
            .partition_point(|&d| d < target)
            .clamp(1, self.points.len() - 1);
        let from = self.points[end_index - 1];
        let to = self.points[end_index];
        let start_distance = self.distances[end_index - 1];
        let span = self.distances[end_index] - start_distance;
        let local = ((target - start_distance) / span).clamp(0.0, 1.0);

        PathSample {
            position: from.lerp(to, local),
            tangent: Some((to - from) / span),
        }
    }

    /// Outline for debug drawing
    pub fn to_path2d(&self) -> Path2D {
        Path2D::move_to(self.start).cubic_to(self.control1, self.control2, self.end)
    }
}

fn cubic_point(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}
