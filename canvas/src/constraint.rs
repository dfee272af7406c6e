//! Constraint engine: decides whether a proposed move is legal and applies
//! rigid-group moves atomically.
//!
//! Every mutating function here validates the whole candidate state first and
//! only then writes to the graph. A rejected move leaves the graph untouched
//! and reports why through [`MoveRejected`]; the state machine logs and drops it.

#[cfg(test)]
#[path = "constraint_test.rs"]
mod constraint_test;

use crate::geom::{Point, Size};
use crate::graph::{Corner, EdgeKind, NodeId, ShapeGraph};

/// Why a proposed move was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoveRejected {
    #[error("position ({x:.1}, {y:.1}) violates the border inset")]
    OutOfBounds { x: f64, y: f64 },

    #[error("node missing from graph")]
    MissingNode,

    #[error("angle {angle:.2} outside [0, {max:.2}]")]
    AngleOutOfRange { angle: f64, max: f64 },

    #[error("rotation vector has zero length")]
    DegenerateAngle,

    #[error("line cannot be clipped to the ring")]
    Unclippable,

    #[error("pivot would leave the ring")]
    PivotOutsideRing,
}

/// The region free nodes may occupy: the image minus an inset band on each side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    size: Size,
    inset_x: f64,
    inset_y: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(size: Size, inset_fraction: f64) -> Self {
        Self { size, inset_x: size.width * inset_fraction, inset_y: size.height * inset_fraction }
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Per-axis clamp into `[inset, dimension - inset]`.
    #[must_use]
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.inset_x, self.size.width - self.inset_x),
            p.y.clamp(self.inset_y, self.size.height - self.inset_y),
        )
    }

    /// A position is available when clamping leaves it unchanged.
    #[must_use]
    pub fn is_available(&self, p: Point) -> bool {
        self.clamp(p) == p
    }

    /// Availability for a line endpoint whose x is pinned to an image edge:
    /// x only has to lie on the image, y must respect the inset.
    #[must_use]
    pub fn is_available_pinned(&self, p: Point) -> bool {
        (0.0..=self.size.width).contains(&p.x) && (self.inset_y..=self.size.height - self.inset_y).contains(&p.y)
    }

    pub(crate) fn check(&self, p: Point) -> Result<(), MoveRejected> {
        if self.is_available(p) { Ok(()) } else { Err(MoveRejected::OutOfBounds { x: p.x, y: p.y }) }
    }
}

/// Whether translating every node in `ids` by `(dx, dy)` keeps all of them available.
#[must_use]
pub fn validate_group_translation(graph: &ShapeGraph, ids: &[NodeId], dx: f64, dy: f64, bounds: &Bounds) -> bool {
    candidate_moves(graph, ids, dx, dy).is_some_and(|moves| moves.iter().all(|(_, p)| bounds.is_available(*p)))
}

/// Translate every node in `ids` in one pass. Call only after validation.
pub fn apply_group_translation(graph: &mut ShapeGraph, ids: &[NodeId], dx: f64, dy: f64) {
    if let Some(moves) = candidate_moves(graph, ids, dx, dy) {
        graph.set_positions(&moves);
    }
}

/// Validate then apply a rigid translation.
///
/// # Errors
///
/// Rejects the whole move if any member is missing or would leave the bounds.
pub fn translate_group(
    graph: &mut ShapeGraph,
    ids: &[NodeId],
    dx: f64,
    dy: f64,
    bounds: &Bounds,
) -> Result<(), MoveRejected> {
    let moves = candidate_moves(graph, ids, dx, dy).ok_or(MoveRejected::MissingNode)?;
    for (_, p) in &moves {
        bounds.check(*p)?;
    }
    graph.set_positions(&moves);
    Ok(())
}

fn candidate_moves(graph: &ShapeGraph, ids: &[NodeId], dx: f64, dy: f64) -> Option<Vec<(NodeId, Point)>> {
    ids.iter()
        .map(|id| graph.node(id).map(|n| (*id, n.position.offset(dx, dy))))
        .collect()
}

/// Move a single free node to `to`.
///
/// # Errors
///
/// Rejects if the node is missing or `to` violates the border inset.
pub fn move_free_node(graph: &mut ShapeGraph, id: &NodeId, to: Point, bounds: &Bounds) -> Result<(), MoveRejected> {
    if graph.node(id).is_none() {
        return Err(MoveRejected::MissingNode);
    }
    bounds.check(to)?;
    graph.set_position(id, to);
    Ok(())
}

/// Move one rectangle corner and drag its two neighbours along so the shape
/// stays axis-aligned: the corner sharing x takes the new x, the corner
/// sharing y takes the new y. The opposite corner does not move.
///
/// # Errors
///
/// Rejects if any of the three positions is out of bounds or a corner is missing.
pub fn move_rectangle_corner(
    graph: &mut ShapeGraph,
    corner: Corner,
    to: Point,
    bounds: &Bounds,
) -> Result<(), MoveRejected> {
    let moved = graph.corner(corner).ok_or(MoveRejected::MissingNode)?.id;
    let x_mate = graph.corner(corner.shares_x()).ok_or(MoveRejected::MissingNode)?;
    let y_mate = graph.corner(corner.shares_y()).ok_or(MoveRejected::MissingNode)?;

    let moves = [
        (moved, to),
        (x_mate.id, Point::new(to.x, x_mate.position.y)),
        (y_mate.id, Point::new(y_mate.position.x, to.y)),
    ];
    for (_, p) in &moves {
        bounds.check(*p)?;
    }
    graph.set_positions(&moves);
    Ok(())
}

/// Horizontal distance between the top-left and top-right corners.
#[must_use]
pub fn rectangle_width(graph: &ShapeGraph) -> Option<f64> {
    let left = graph.corner(Corner::TopLeft)?;
    let right = graph.corner(Corner::TopRight)?;
    Some((right.position.x - left.position.x).abs())
}

/// Width label text: pixels and percentage of the image width, both rounded.
#[must_use]
pub fn width_label(width: f64, image_width: f64) -> String {
    let percent = if image_width > 0.0 { width / image_width * 100.0 } else { 0.0 };
    format!("{}px \u{2014} {}%", width.round(), percent.round())
}

/// Recompute the label on the ring edge leaving the top-left corner.
/// Returns false when the rectangle or its first edge is not there yet.
pub fn refresh_width_label(graph: &mut ShapeGraph, image_width: f64) -> bool {
    let Some(width) = rectangle_width(graph) else {
        return false;
    };
    let Some(top_left) = graph.corner(Corner::TopLeft).map(|n| n.id) else {
        return false;
    };
    let Some(edge) = graph.edges().iter().find(|e| e.kind == EdgeKind::Ring && e.source == top_left).map(|e| e.id)
    else {
        return false;
    };
    graph.set_edge_label(&edge, Some(width_label(width, image_width)))
}
