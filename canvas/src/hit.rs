//! Hit-testing: which part of the annotation is under an image-space point.
//!
//! Each probe answers one question against the graph. Task handlers call them
//! in priority order (pivot, line body, corner or vertex, polygon interior) and
//! stop at the first match, so at most one manipulation can start per press.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geom::{self, Point};
use crate::graph::{Corner, LineSide, NodeId, NodeRole, RoleKind, ShapeGraph};

/// The manipulable part found under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Rotation pivot of reference line `line`.
    Pivot { line: usize },
    /// Body of reference line `line`, away from its pivot.
    LineBody { line: usize },
    /// A selection rectangle corner.
    Corner { corner: Corner },
    /// A single free dot.
    Vertex { id: NodeId },
    /// Inside the closed polygon ring, clear of every vertex.
    Interior,
}

impl Hit {
    /// CSS cursor shown while hovering this part.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        match self {
            Self::Pivot { .. } => "grab",
            Self::LineBody { .. } => "ns-resize",
            Self::Corner { corner: Corner::TopLeft | Corner::BottomRight } => "nwse-resize",
            Self::Corner { corner: Corner::TopRight | Corner::BottomLeft } => "nesw-resize",
            Self::Vertex { .. } => "pointer",
            Self::Interior => "move",
        }
    }
}

/// Cursor when nothing is hovered.
pub const DEFAULT_CURSOR: &str = "default";

/// First rotation pivot within `radius` of `p`.
#[must_use]
pub fn pivot_hit(graph: &ShapeGraph, p: Point, radius: f64) -> Option<Hit> {
    graph.nodes_by_role(RoleKind::RotationPivot).into_iter().find_map(|n| match n.role {
        NodeRole::RotationPivot { line } if geom::point_in_circle(n.position, radius, p) => Some(Hit::Pivot { line }),
        _ => None,
    })
}

/// First reference line whose segment passes within `epsilon` of `p`.
#[must_use]
pub fn line_body_hit(graph: &ShapeGraph, p: Point, epsilon: f64) -> Option<Hit> {
    graph.nodes_by_role(RoleKind::RotationPivot).into_iter().find_map(|n| {
        let NodeRole::RotationPivot { line } = n.role else {
            return None;
        };
        let left = graph.line_endpoint(line, LineSide::Left)?.position;
        let right = graph.line_endpoint(line, LineSide::Right)?.position;
        geom::point_on_segment(left, right, p, epsilon).then_some(Hit::LineBody { line })
    })
}

/// Nearest rectangle corner within `radius` of `p`.
#[must_use]
pub fn corner_hit(graph: &ShapeGraph, p: Point, radius: f64) -> Option<Hit> {
    nearest(graph, RoleKind::RectangleCorner, p, radius).and_then(|role| match role.1 {
        NodeRole::RectangleCorner { corner } => Some(Hit::Corner { corner }),
        _ => None,
    })
}

/// Nearest free dot within `radius` of `p`.
#[must_use]
pub fn vertex_hit(graph: &ShapeGraph, p: Point, radius: f64) -> Option<Hit> {
    nearest(graph, RoleKind::FreeDot, p, radius).map(|(id, _)| Hit::Vertex { id })
}

/// Whether `p` is inside the closed ring (vertex exclusion applies).
#[must_use]
pub fn interior_hit(graph: &ShapeGraph, p: Point) -> Option<Hit> {
    if !graph.is_full() {
        return None;
    }
    geom::point_in_polygon(&graph.ring_positions(), p).then_some(Hit::Interior)
}

fn nearest(graph: &ShapeGraph, kind: RoleKind, p: Point, radius: f64) -> Option<(NodeId, NodeRole)> {
    graph
        .nodes_by_role(kind)
        .into_iter()
        .map(|n| (n.position.distance(p), n))
        .filter(|(d, _)| *d <= radius)
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, n)| (n.id, n.role))
}
