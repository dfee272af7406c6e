//! Reference lines: seeding, rotation about a pivot, vertical translation, and
//! clipping to the polygon ring.
//!
//! A line is three graph nodes (left endpoint, right endpoint, pivot) plus an
//! angle kept here. Full-width lines pin their endpoints to x = 0 and x =
//! width. Clipped lines end where a ray from the pivot first crosses the ring;
//! their endpoints are a derived value, recomputed whenever the ring's
//! generation counter moves past the one last synced.

#[cfg(test)]
#[path = "lines_test.rs"]
mod lines_test;

use crate::consts::LINES_PROBE_OFFSET;
use crate::constraint::{Bounds, MoveRejected};
use crate::geom::{self, Point, Size};
use crate::graph::{EdgeKind, LineSide, NodeId, NodeRole, ShapeGraph};
use crate::task::{Task, TaskKind};

/// How a line's endpoints are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// Endpoints pinned to the left and right image edges.
    FullWidth,
    /// Endpoints clipped to the polygon ring.
    Clipped,
}

/// Rotation state of one line, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineAngle {
    /// Angle committed at the end of the last rotation gesture.
    pub baseline: f64,
    /// Angle currently applied to the endpoints.
    pub current: f64,
}

/// Largest rotation before a centred full-width line would leave the image.
#[must_use]
pub fn max_angle(size: Size) -> f64 {
    let (half_w, half_h) = (size.width / 2.0, size.height / 2.0);
    let (shorter, longer) = if half_w < half_h { (half_w, half_h) } else { (half_h, half_w) };
    if longer <= 0.0 {
        return 0.0;
    }
    (shorter / longer).atan().to_degrees()
}

/// Endpoints of a line through `pivot` at `angle` degrees, pinned to x = 0 and x = `width`.
#[must_use]
pub fn full_width_endpoints(pivot: Point, angle: f64, width: f64) -> (Point, Point) {
    let slope = angle.to_radians().tan();
    (
        Point::new(0.0, pivot.y + (0.0 - pivot.x) * slope),
        Point::new(width, pivot.y + (width - pivot.x) * slope),
    )
}

/// Nearest point where the ray from `origin` at `angle` degrees crosses a ring edge.
#[must_use]
pub fn clip_ray(ring: &[Point], origin: Point, angle: f64) -> Option<Point> {
    if ring.len() < 3 {
        return None;
    }
    let (sin, cos) = angle.to_radians().sin_cos();
    let probe = origin.offset(cos, sin);

    let n = ring.len();
    (0..n)
        .filter_map(|i| {
            let (a, b) = (ring[i], ring[(i + 1) % n]);
            let hit = geom::line_intersection(a, b, origin, probe)?;
            let along = (hit.x - origin.x) * cos + (hit.y - origin.y) * sin;
            (along > 0.0 && geom::is_between(a, b, hit)).then_some((along, hit))
        })
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, hit)| hit)
}

/// Left and right ends of the line through `pivot` at `angle`, clipped to `ring`.
#[must_use]
pub fn clipped_endpoints(ring: &[Point], pivot: Point, angle: f64) -> Option<(Point, Point)> {
    let left = clip_ray(ring, pivot, angle + 180.0)?;
    let right = clip_ray(ring, pivot, angle)?;
    Some((left, right))
}

/// Owns the angles of every reference line in the session.
#[derive(Debug, Clone)]
pub struct LineRig {
    mode: LineMode,
    count: usize,
    angles: Vec<LineAngle>,
    max_angle: f64,
    synced_generation: u64,
}

impl LineRig {
    /// Rig for the task's lines. Tasks without lines get an empty rig.
    #[must_use]
    pub fn for_task(task: &Task) -> Self {
        let mode = if task.kind == TaskKind::Lines { LineMode::Clipped } else { LineMode::FullWidth };
        Self { mode, count: task.line_total(), angles: Vec::new(), max_angle: 0.0, synced_generation: 0 }
    }

    #[must_use]
    pub fn mode(&self) -> LineMode {
        self.mode
    }

    #[must_use]
    pub fn is_seeded(&self) -> bool {
        !self.angles.is_empty()
    }

    #[must_use]
    pub fn max_angle(&self) -> f64 {
        self.max_angle
    }

    #[must_use]
    pub fn angle(&self, line: usize) -> Option<LineAngle> {
        self.angles.get(line).copied()
    }

    /// Number of lines once seeded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.angles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.angles.is_empty()
    }

    /// Forget all line state; the graph is reset separately.
    pub fn reset(&mut self) {
        self.angles.clear();
        self.synced_generation = 0;
    }

    /// Create the line nodes and edges.
    ///
    /// Full-width lines need only the image size. Clipped lines need a
    /// complete ring and probe horizontally from its centroid. Either all
    /// lines are added or none are.
    ///
    /// # Errors
    ///
    /// [`MoveRejected::Unclippable`] when a probe misses the ring on either side.
    pub fn seed(&mut self, graph: &mut ShapeGraph, size: Size) -> Result<usize, MoveRejected> {
        if self.is_seeded() || self.count == 0 {
            return Ok(0);
        }
        if self.mode == LineMode::Clipped && !graph.is_full() {
            return Ok(0);
        }

        let placements = match self.mode {
            LineMode::FullWidth => {
                let pivot = Point::new(size.width / 2.0, size.height / 2.0);
                let (left, right) = full_width_endpoints(pivot, 0.0, size.width);
                vec![(left, right, pivot)]
            }
            LineMode::Clipped => self.probe_ring(graph)?,
        };

        for (line, (left, right, pivot)) in placements.iter().enumerate() {
            let a = graph.add_node(*left, NodeRole::LineEndpoint { line, side: LineSide::Left });
            let b = graph.add_node(*right, NodeRole::LineEndpoint { line, side: LineSide::Right });
            graph.add_node(*pivot, NodeRole::RotationPivot { line });
            if let (Some(a), Some(b)) = (a, b) {
                graph.add_edge(a, b, EdgeKind::Line, None);
            }
        }

        self.angles = vec![LineAngle::default(); placements.len()];
        self.max_angle = max_angle(size);
        self.synced_generation = graph.generation();
        tracing::info!(lines = placements.len(), max_angle = self.max_angle, "reference lines seeded");
        Ok(placements.len())
    }

    fn probe_ring(&self, graph: &ShapeGraph) -> Result<Vec<(Point, Point, Point)>, MoveRejected> {
        let ring = graph.ring_positions();
        let center = geom::centroid(&ring).ok_or(MoveRejected::Unclippable)?;
        let offsets: &[f64] = if self.count == 1 { &[0.0] } else { &[LINES_PROBE_OFFSET, -LINES_PROBE_OFFSET] };

        offsets
            .iter()
            .map(|offset| {
                let probe = center.offset(0.0, *offset);
                let (left, right) = clipped_endpoints(&ring, probe, 0.0).ok_or(MoveRejected::Unclippable)?;
                Ok((left, right, left.midpoint(right)))
            })
            .collect()
    }

    /// Ids of every line endpoint and pivot, in graph order.
    #[must_use]
    pub fn node_ids(graph: &ShapeGraph) -> Vec<NodeId> {
        graph
            .nodes()
            .iter()
            .filter(|n| matches!(n.role, NodeRole::LineEndpoint { .. } | NodeRole::RotationPivot { .. }))
            .map(|n| n.id)
            .collect()
    }

    fn line_ids(graph: &ShapeGraph, line: usize) -> Result<(NodeId, NodeId, NodeId, Point), MoveRejected> {
        let left = graph.line_endpoint(line, LineSide::Left).ok_or(MoveRejected::MissingNode)?;
        let right = graph.line_endpoint(line, LineSide::Right).ok_or(MoveRejected::MissingNode)?;
        let pivot = graph.pivot(line).ok_or(MoveRejected::MissingNode)?;
        Ok((left.id, right.id, pivot.id, pivot.position))
    }

    fn endpoints(&self, graph: &ShapeGraph, pivot: Point, angle: f64, size: Size) -> Option<(Point, Point)> {
        match self.mode {
            LineMode::FullWidth => Some(full_width_endpoints(pivot, angle, size.width)),
            LineMode::Clipped => clipped_endpoints(&graph.ring_positions(), pivot, angle),
        }
    }

    fn endpoint_available(&self, bounds: &Bounds, p: Point) -> bool {
        match self.mode {
            LineMode::FullWidth => bounds.is_available_pinned(p),
            LineMode::Clipped => bounds.is_available(p),
        }
    }

    /// Rotate `line` so the angle from `first_contact` to `pointer` (around the
    /// pivot) is added to the committed baseline.
    ///
    /// # Errors
    ///
    /// Rejects without mutating when the angle is degenerate, leaves
    /// `[0, max_angle]`, the line cannot be clipped, or an endpoint would
    /// leave the image.
    pub fn rotate(
        &mut self,
        graph: &mut ShapeGraph,
        line: usize,
        first_contact: Point,
        pointer: Point,
        bounds: &Bounds,
    ) -> Result<f64, MoveRejected> {
        let state = self.angle(line).ok_or(MoveRejected::MissingNode)?;
        let (left_id, right_id, _, pivot) = Self::line_ids(graph, line)?;

        let delta = geom::signed_angle(pivot, first_contact, pointer).ok_or(MoveRejected::DegenerateAngle)?;
        let candidate = state.baseline + delta;
        if !(0.0..=self.max_angle).contains(&candidate) {
            return Err(MoveRejected::AngleOutOfRange { angle: candidate, max: self.max_angle });
        }

        let (left, right) = self.endpoints(graph, pivot, candidate, bounds.size()).ok_or(MoveRejected::Unclippable)?;
        for p in [left, right] {
            if !self.endpoint_available(bounds, p) {
                return Err(MoveRejected::OutOfBounds { x: p.x, y: p.y });
            }
        }

        graph.set_positions(&[(left_id, left), (right_id, right)]);
        if let Some(angle) = self.angles.get_mut(line) {
            angle.current = candidate;
        }
        Ok(candidate)
    }

    /// Make the current angle the baseline for the next rotation gesture.
    pub fn commit(&mut self, line: usize) {
        if let Some(angle) = self.angles.get_mut(line) {
            angle.baseline = angle.current;
        }
    }

    /// Move `line` vertically by `dy`; x stays put.
    ///
    /// Clipped lines also require the new pivot to stay inside the ring and
    /// re-centre the pivot between the re-clipped endpoints.
    ///
    /// # Errors
    ///
    /// Rejects without mutating when any of the three nodes would become
    /// unavailable, the pivot leaves the ring, or clipping fails.
    pub fn translate(&mut self, graph: &mut ShapeGraph, line: usize, dy: f64, bounds: &Bounds) -> Result<(), MoveRejected> {
        let state = self.angle(line).ok_or(MoveRejected::MissingNode)?;
        let (left_id, right_id, pivot_id, pivot) = Self::line_ids(graph, line)?;
        let moved = pivot.offset(0.0, dy);

        let (left, right, pivot) = match self.mode {
            LineMode::FullWidth => {
                bounds.check(moved)?;
                let (left, right) = full_width_endpoints(moved, state.current, bounds.size().width);
                (left, right, moved)
            }
            LineMode::Clipped => {
                let ring = graph.ring_positions();
                if !geom::ring_contains(&ring, moved) {
                    return Err(MoveRejected::PivotOutsideRing);
                }
                let (left, right) = clipped_endpoints(&ring, moved, state.current).ok_or(MoveRejected::Unclippable)?;
                (left, right, left.midpoint(right))
            }
        };

        for p in [left, right] {
            if !self.endpoint_available(bounds, p) {
                return Err(MoveRejected::OutOfBounds { x: p.x, y: p.y });
            }
        }

        graph.set_positions(&[(left_id, left), (right_id, right), (pivot_id, pivot)]);
        Ok(())
    }

    /// Re-derive clipped endpoints if the ring changed since the last sync.
    ///
    /// Returns true when endpoints were rewritten. If any line can no longer
    /// be clipped, all lines keep their previous endpoints.
    pub fn resync(&mut self, graph: &mut ShapeGraph) -> bool {
        if self.mode != LineMode::Clipped || !self.is_seeded() || self.synced_generation == graph.generation() {
            return false;
        }
        self.synced_generation = graph.generation();

        let ring = graph.ring_positions();
        let mut moves = Vec::with_capacity(self.angles.len() * 2);
        for (line, state) in self.angles.iter().enumerate() {
            let Ok((left_id, right_id, _, pivot)) = Self::line_ids(graph, line) else {
                return false;
            };
            let Some((left, right)) = clipped_endpoints(&ring, pivot, state.current) else {
                tracing::warn!(line, "ring change left line unclippable; keeping previous endpoints");
                return false;
            };
            moves.push((left_id, left));
            moves.push((right_id, right));
        }
        graph.set_positions(&moves)
    }
}
