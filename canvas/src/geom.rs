//! Geometry kernel: stateless predicates and solvers over image-space points.
//!
//! Everything here is pure. Callers own the decision of what to do with a
//! `false` or `None`; nothing in this module mutates shape state.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{PARALLEL_EPSILON, VERTEX_EXCLUSION_RADIUS};

/// Tolerance used by range checks on computed intersections.
const RANGE_EPSILON: f64 = 1e-9;

/// A point in image-pixel (world) or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub fn midpoint(self, other: Point) -> Self {
        Self { x: (self.x + other.x) / 2.0, y: (self.y + other.y) / 2.0 }
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero, negative, or not finite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Crossing-number containment test with no vertex exclusion.
#[must_use]
pub fn ring_contains(ring: &[Point], p: Point) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let vi = ring[i];
        let vj = ring[j];
        if ((vi.y > p.y) != (vj.y > p.y)) && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Whether `p` is strictly inside the polygon `ring`.
///
/// A point within [`VERTEX_EXCLUSION_RADIUS`] of any vertex is reported as
/// outside. That check runs before the parity loop so a click meant for a
/// vertex never starts a whole-shape drag.
#[must_use]
pub fn point_in_polygon(ring: &[Point], p: Point) -> bool {
    if ring.len() < 3 {
        return false;
    }
    if ring.iter().any(|v| v.distance(p) <= VERTEX_EXCLUSION_RADIUS) {
        return false;
    }
    ring_contains(ring, p)
}

/// Whether `p` lies on segment `a`–`b`, allowing `epsilon` of extra path length.
#[must_use]
pub fn point_on_segment(a: Point, b: Point, p: Point, epsilon: f64) -> bool {
    a.distance(p) + p.distance(b) <= a.distance(b) + epsilon
}

#[must_use]
pub fn point_in_circle(center: Point, radius: f64, p: Point) -> bool {
    center.distance(p) <= radius
}

/// Angle in degrees from vector `from - pivot` to vector `to - pivot`.
///
/// The magnitude comes from `acos` of the normalised dot product and is
/// therefore always in `[0, 180]`; the sign comes from the 2D cross product
/// (positive is clockwise on a y-down screen). Returns `None` when either
/// vector has zero length.
#[must_use]
pub fn signed_angle(pivot: Point, from: Point, to: Point) -> Option<f64> {
    let (ax, ay) = (from.x - pivot.x, from.y - pivot.y);
    let (bx, by) = (to.x - pivot.x, to.y - pivot.y);
    let lengths = ax.hypot(ay) * bx.hypot(by);
    if lengths <= f64::EPSILON {
        return None;
    }

    let cos = ((ax * bx + ay * by) / lengths).clamp(-1.0, 1.0);
    let magnitude = cos.acos().to_degrees();
    let cross = ax * by - ay * bx;
    Some(if cross < 0.0 { -magnitude } else { magnitude })
}

/// Intersection of the infinite lines through `p1`–`p2` and `q1`–`q2`.
///
/// Solved in slope/intercept form. Parallel lines (equal slopes, or both
/// vertical) have no intersection and return `None`; the caller must treat
/// that as "skip this tick".
#[must_use]
pub fn line_intersection(p1: Point, p2: Point, q1: Point, q2: Point) -> Option<Point> {
    let dxp = p2.x - p1.x;
    let dxq = q2.x - q1.x;
    let p_vertical = dxp.abs() < PARALLEL_EPSILON;
    let q_vertical = dxq.abs() < PARALLEL_EPSILON;

    let hit = match (p_vertical, q_vertical) {
        (true, true) => return None,
        (true, false) => {
            let m2 = (q2.y - q1.y) / dxq;
            let b2 = q1.y - m2 * q1.x;
            Point::new(p1.x, m2 * p1.x + b2)
        }
        (false, true) => {
            let m1 = (p2.y - p1.y) / dxp;
            let b1 = p1.y - m1 * p1.x;
            Point::new(q1.x, m1 * q1.x + b1)
        }
        (false, false) => {
            let m1 = (p2.y - p1.y) / dxp;
            let b1 = p1.y - m1 * p1.x;
            let m2 = (q2.y - q1.y) / dxq;
            let b2 = q1.y - m2 * q1.x;
            if (m1 - m2).abs() < PARALLEL_EPSILON {
                return None;
            }
            let x = (b2 - b1) / (m1 - m2);
            Point::new(x, m1 * x + b1)
        }
    };

    (hit.x.is_finite() && hit.y.is_finite()).then_some(hit)
}

/// Whether `p` falls within segment `a`–`b` along the segment's dominant axis.
///
/// Used to confirm that a computed intersection lies on the finite segment
/// rather than on its infinite extension.
#[must_use]
pub fn is_between(a: Point, b: Point, p: Point) -> bool {
    let (lo, hi, v) = if (b.x - a.x).abs() >= (b.y - a.y).abs() {
        (a.x.min(b.x), a.x.max(b.x), p.x)
    } else {
        (a.y.min(b.y), a.y.max(b.y), p.y)
    };
    v >= lo - RANGE_EPSILON && v <= hi + RANGE_EPSILON
}

/// Arithmetic mean of the ring vertices.
#[must_use]
pub fn centroid(ring: &[Point]) -> Option<Point> {
    if ring.is_empty() {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = ring.len() as f64;
    let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}
