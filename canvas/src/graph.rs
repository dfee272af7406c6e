//! Shape graph: annotation nodes, the edges between them, and the ordered store.
//!
//! Nodes are kept in insertion order and never reordered; that order is what
//! defines polygon ring adjacency. Derived groupings (the ring, a line's
//! endpoints, its pivot) are computed by role filter rather than stored.
//!
//! Only "counted" roles (free dots and rectangle corners) are capped by the
//! task's required node count. Line endpoints and pivots are auxiliary nodes
//! seeded by task setup and sit outside the cap.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Point;

/// Unique identifier for a node.
pub type NodeId = Uuid;

/// Unique identifier for an edge.
pub type EdgeId = Uuid;

/// One corner of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Ring order: clockwise from the top-left.
    pub const ALL: [Corner; 4] = [Corner::TopLeft, Corner::TopRight, Corner::BottomRight, Corner::BottomLeft];

    /// The neighbour that shares this corner's x coordinate.
    #[must_use]
    pub fn shares_x(self) -> Corner {
        match self {
            Self::TopLeft => Self::BottomLeft,
            Self::TopRight => Self::BottomRight,
            Self::BottomRight => Self::TopRight,
            Self::BottomLeft => Self::TopLeft,
        }
    }

    /// The neighbour that shares this corner's y coordinate.
    #[must_use]
    pub fn shares_y(self) -> Corner {
        match self {
            Self::TopLeft => Self::TopRight,
            Self::TopRight => Self::TopLeft,
            Self::BottomRight => Self::BottomLeft,
            Self::BottomLeft => Self::BottomRight,
        }
    }
}

/// Which end of a reference line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSide {
    Left,
    Right,
}

/// What a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum NodeRole {
    /// A freely placed point (points and polygon tasks).
    FreeDot,
    /// A corner of the selection rectangle.
    RectangleCorner { corner: Corner },
    /// One end of reference line `line`.
    LineEndpoint { line: usize, side: LineSide },
    /// The rotation pivot of reference line `line`.
    RotationPivot { line: usize },
}

/// Field-less mirror of [`NodeRole`] used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    FreeDot,
    RectangleCorner,
    LineEndpoint,
    RotationPivot,
}

impl NodeRole {
    #[must_use]
    pub fn kind(self) -> RoleKind {
        match self {
            Self::FreeDot => RoleKind::FreeDot,
            Self::RectangleCorner { .. } => RoleKind::RectangleCorner,
            Self::LineEndpoint { .. } => RoleKind::LineEndpoint,
            Self::RotationPivot { .. } => RoleKind::RotationPivot,
        }
    }

    /// Whether nodes with this role count against the node cap and form the ring.
    #[must_use]
    pub fn is_counted(self) -> bool {
        matches!(self, Self::FreeDot | Self::RectangleCorner { .. })
    }
}

/// An annotation point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Position in image-pixel space.
    pub position: Point,
    pub role: NodeRole,
    /// Immovable by direct drag; moved only by constraint propagation.
    pub locked: bool,
    pub selectable: bool,
}

/// How an edge was created; drives styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Ring adjacency edge `i -> i+1 mod n`.
    Ring,
    /// One of the all-pairs edges of a points task.
    Pair,
    /// A reference line between its two endpoints.
    Line,
}

/// A visual connector between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub kind: EdgeKind,
    pub label: Option<String>,
}

/// Ordered store of nodes and edges for one annotation session.
#[derive(Debug, Clone)]
pub struct ShapeGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    capacity: usize,
    generation: u64,
}

impl ShapeGraph {
    /// Create an empty graph that accepts at most `capacity` counted nodes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self { nodes: Vec::new(), edges: Vec::new(), capacity, generation: 0 }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a node. Returns `None` (and changes nothing) when the role is
    /// counted and the cap is already reached.
    pub fn add_node(&mut self, position: Point, role: NodeRole) -> Option<NodeId> {
        if role.is_counted() && self.is_full() {
            return None;
        }

        let auxiliary = !role.is_counted();
        let id = Uuid::new_v4();
        self.nodes.push(Node { id, position, role, locked: auxiliary, selectable: !auxiliary });
        if role.is_counted() {
            self.generation += 1;
        }
        Some(id)
    }

    /// Connect two existing nodes. Returns `None` if either endpoint is unknown.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId, kind: EdgeKind, label: Option<String>) -> Option<EdgeId> {
        if self.node(&source).is_none() || self.node(&target).is_none() {
            return None;
        }
        let id = Uuid::new_v4();
        self.edges.push(Edge { id, source, target, kind, label });
        Some(id)
    }

    /// Replace an edge's label. Returns false if the edge doesn't exist.
    pub fn set_edge_label(&mut self, id: &EdgeId, label: Option<String>) -> bool {
        let Some(edge) = self.edges.iter_mut().find(|e| e.id == *id) else {
            return false;
        };
        edge.label = label;
        true
    }

    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All nodes of a role kind, in insertion order.
    #[must_use]
    pub fn nodes_by_role(&self, kind: RoleKind) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.role.kind() == kind).collect()
    }

    /// Counted nodes in insertion (ring) order.
    #[must_use]
    pub fn ring(&self) -> Vec<&Node> {
        self.nodes.iter().filter(|n| n.role.is_counted()).collect()
    }

    #[must_use]
    pub fn ring_ids(&self) -> Vec<NodeId> {
        self.ring().iter().map(|n| n.id).collect()
    }

    #[must_use]
    pub fn ring_positions(&self) -> Vec<Point> {
        self.ring().iter().map(|n| n.position).collect()
    }

    #[must_use]
    pub fn corner(&self, corner: Corner) -> Option<&Node> {
        self.nodes.iter().find(|n| n.role == NodeRole::RectangleCorner { corner })
    }

    #[must_use]
    pub fn line_endpoint(&self, line: usize, side: LineSide) -> Option<&Node> {
        self.nodes.iter().find(|n| n.role == NodeRole::LineEndpoint { line, side })
    }

    #[must_use]
    pub fn pivot(&self, line: usize) -> Option<&Node> {
        self.nodes.iter().find(|n| n.role == NodeRole::RotationPivot { line })
    }

    /// Number of nodes that count against the cap.
    #[must_use]
    pub fn counted_len(&self) -> usize {
        self.nodes.iter().filter(|n| n.role.is_counted()).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.counted_len() >= self.capacity
    }

    /// Move one node. Returns false if the node doesn't exist.
    pub fn set_position(&mut self, id: &NodeId, position: Point) -> bool {
        self.set_positions(&[(*id, position)])
    }

    /// Move several nodes at once. Either every id exists and all move, or
    /// nothing moves and false is returned.
    pub fn set_positions(&mut self, moves: &[(NodeId, Point)]) -> bool {
        if moves.iter().any(|(id, _)| self.node(id).is_none()) {
            return false;
        }

        let mut ring_changed = false;
        for (id, position) in moves {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == *id) {
                node.position = *position;
                ring_changed |= node.role.is_counted();
            }
        }
        if ring_changed {
            self.generation += 1;
        }
        true
    }

    /// Add ring edges `i -> i+1 mod n` over the counted nodes.
    ///
    /// Only runs once the cap is reached and no ring edges exist yet. Returns
    /// the ids of the created edges in ring order.
    pub fn close_ring(&mut self) -> Vec<EdgeId> {
        if !self.is_full() || self.edges.iter().any(|e| e.kind == EdgeKind::Ring) {
            return Vec::new();
        }

        let ids = self.ring_ids();
        let n = ids.len();
        if n < 2 {
            return Vec::new();
        }
        (0..n)
            .filter_map(|i| self.add_edge(ids[i], ids[(i + 1) % n], EdgeKind::Ring, None))
            .collect()
    }

    /// Add one edge per unordered pair of counted nodes.
    pub fn connect_all_pairs(&mut self) -> usize {
        if self.edges.iter().any(|e| e.kind == EdgeKind::Pair) {
            return 0;
        }

        let ids = self.ring_ids();
        let mut created = 0;
        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                if self.add_edge(ids[i], ids[j], EdgeKind::Pair, None).is_some() {
                    created += 1;
                }
            }
        }
        created
    }

    /// Counter bumped whenever a counted (ring) node is added or moved.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Drop all nodes and edges. The generation keeps counting so derived
    /// values still notice the change.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.generation += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
