//! Position export for the host's position callback.

#[cfg(test)]
#[path = "export_test.rs"]
mod export_test;

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Size};
use crate::graph::ShapeGraph;

/// Every node's position in pixel space and as a fraction of the image size,
/// in graph insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePositions {
    pub positions: Vec<Point>,
    pub percentage_positions: Vec<Point>,
}

impl NodePositions {
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Snapshot node positions. An empty image size yields zero percentages.
#[must_use]
pub fn export_positions(graph: &ShapeGraph, image: Size) -> NodePositions {
    let positions: Vec<Point> = graph.nodes().iter().map(|n| n.position).collect();
    let percentage_positions = positions.iter().map(|p| relative(*p, image)).collect();
    NodePositions { positions, percentage_positions }
}

fn relative(p: Point, image: Size) -> Point {
    if image.is_empty() {
        return Point::default();
    }
    Point::new(p.x / image.width, p.y / image.height)
}
