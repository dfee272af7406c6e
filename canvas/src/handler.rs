//! Per-task behaviour behind one small capability trait.
//!
//! The task is fixed for a session, so the engine picks a handler once with
//! [`handler_for`] and calls through it for placement, hit-testing, seeding
//! and styling. Drag ticks are routed by the gesture state, not by task.

#[cfg(test)]
#[path = "handler_test.rs"]
mod handler_test;

use crate::constraint::{self, Bounds, MoveRejected};
use crate::geom::{Point, Size};
use crate::graph::{Corner, NodeId, NodeRole, ShapeGraph};
use crate::hit::{self, Hit};
use crate::lines::LineRig;
use crate::render::{EdgeStyle, NodeShape, NodeStyle, Style};
use crate::task::{Task, TaskKind};

const POLYGON_FILL: &str = "rgba(0, 0, 255, 0.1)";
const LINE_FILL: &str = "rgba(255, 255, 0, 0.1)";
const BLUE: &str = "blue";

/// Everything one annotation session mutates: the task, its graph, its lines,
/// and the image the bounds derive from.
#[derive(Debug, Clone)]
pub struct Scene {
    pub task: Task,
    pub graph: ShapeGraph,
    pub lines: LineRig,
    image: Size,
    bounds: Bounds,
}

impl Scene {
    #[must_use]
    pub fn new(task: Task) -> Self {
        let image = Size::default();
        Self {
            task,
            graph: ShapeGraph::new(task.required_node_count),
            lines: LineRig::for_task(&task),
            image,
            bounds: Bounds::new(image, task.border_inset_fraction),
        }
    }

    #[must_use]
    pub fn image(&self) -> Size {
        self.image
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }

    pub fn set_image(&mut self, image: Size) {
        self.image = image;
        self.bounds = Bounds::new(image, self.task.border_inset_fraction);
    }

    /// Drop all nodes, edges and line state. Image and task are kept.
    pub fn reset(&mut self) {
        self.graph.clear();
        self.lines.reset();
    }
}

/// Task-specific capabilities.
pub trait TaskHandler {
    fn kind(&self) -> TaskKind;

    /// Called once the image size is known. Creates nodes that exist before
    /// any click (the full-width reference line).
    ///
    /// # Errors
    ///
    /// Propagates a rejection from line seeding.
    fn on_image_loaded(&self, _scene: &mut Scene) -> Result<(), MoveRejected> {
        Ok(())
    }

    /// Place a node for a click at `at` (image space). Returns the new id, or
    /// `None` when this task doesn't place on click or the cap is reached.
    fn place(&self, scene: &mut Scene, at: Point) -> Option<NodeId>;

    /// Seed the whole shape from a completed drag box. Only the selection
    /// task uses this.
    fn complete_box(&self, _scene: &mut Scene, _a: Point, _b: Point) -> bool {
        false
    }

    /// Whether pointer-down on empty canvas starts a drag box.
    fn uses_drag_box(&self) -> bool {
        false
    }

    /// The manipulable part under `at`, checked in priority order.
    /// `handle_radius` is the node grab radius in image units.
    fn hit_test(&self, scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit>;

    /// Fill colour for the closed ring overlay, if this task draws one.
    fn overlay_fill(&self) -> Option<&'static str> {
        None
    }

    fn style(&self) -> Style;
}

/// Pick the handler for a task kind.
#[must_use]
pub fn handler_for(kind: TaskKind) -> Box<dyn TaskHandler> {
    match kind {
        TaskKind::Points => Box::new(PointsHandler),
        TaskKind::Polygon => Box::new(PolygonHandler),
        TaskKind::Selection => Box::new(SelectionHandler),
        TaskKind::Line => Box::new(LineHandler),
        TaskKind::Lines => Box::new(LinesHandler),
    }
}

/// Clamp and append a free dot. Returns the id when appended.
fn place_dot(scene: &mut Scene, at: Point) -> Option<NodeId> {
    if scene.graph.is_full() {
        return None;
    }
    let clamped = scene.bounds.clamp(at);
    scene.graph.add_node(clamped, NodeRole::FreeDot)
}

/// Place, and close the ring once the cap is reached.
fn place_ring_dot(scene: &mut Scene, at: Point) -> Option<NodeId> {
    let id = place_dot(scene, at)?;
    if scene.graph.is_full() {
        let edges = scene.graph.close_ring();
        tracing::info!(nodes = scene.graph.counted_len(), edges = edges.len(), "polygon ring closed");
    }
    Some(id)
}

fn ring_hit(scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
    hit::vertex_hit(&scene.graph, at, handle_radius).or_else(|| hit::interior_hit(&scene.graph, at))
}

fn line_hit(scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
    hit::pivot_hit(&scene.graph, at, scene.task.pivot_hit_radius)
        .or_else(|| hit::line_body_hit(&scene.graph, at, crate::consts::LINE_HIT_EPSILON))
        .or_else(|| ring_hit(scene, at, handle_radius))
}

fn polygon_style() -> Style {
    Style {
        node: NodeStyle { diameter: 10.0, shape: NodeShape::Ellipse, color: BLUE, font_size: 0.0, label_offset_y: 0.0 },
        edge: EdgeStyle { width: 1.0, color: BLUE, font_size: 0.0, font_weight: 400, label_offset_y: 0.0 },
    }
}

// =============================================================
// Points
// =============================================================

/// Free markers, all-pairs connected once the cap is reached.
pub struct PointsHandler;

impl TaskHandler for PointsHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Points
    }

    fn place(&self, scene: &mut Scene, at: Point) -> Option<NodeId> {
        let id = place_dot(scene, at)?;
        if scene.graph.is_full() {
            let edges = scene.graph.connect_all_pairs();
            tracing::info!(edges, "points connected");
        }
        Some(id)
    }

    fn hit_test(&self, scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
        hit::vertex_hit(&scene.graph, at, handle_radius)
    }

    fn style(&self) -> Style {
        Style {
            node: NodeStyle { diameter: 110.0, shape: NodeShape::Ellipse, color: BLUE, font_size: 20.0, label_offset_y: 26.0 },
            edge: EdgeStyle { width: 1.0, color: BLUE, font_size: 0.0, font_weight: 400, label_offset_y: 0.0 },
        }
    }
}

// =============================================================
// Polygon
// =============================================================

/// A closed ring of free dots.
pub struct PolygonHandler;

impl TaskHandler for PolygonHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Polygon
    }

    fn place(&self, scene: &mut Scene, at: Point) -> Option<NodeId> {
        place_ring_dot(scene, at)
    }

    fn hit_test(&self, scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
        ring_hit(scene, at, handle_radius)
    }

    fn overlay_fill(&self) -> Option<&'static str> {
        Some(POLYGON_FILL)
    }

    fn style(&self) -> Style {
        polygon_style()
    }
}

// =============================================================
// Selection
// =============================================================

/// An axis-aligned rectangle drawn with one drag box.
pub struct SelectionHandler;

impl TaskHandler for SelectionHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Selection
    }

    fn place(&self, _scene: &mut Scene, _at: Point) -> Option<NodeId> {
        None
    }

    fn uses_drag_box(&self) -> bool {
        true
    }

    fn complete_box(&self, scene: &mut Scene, a: Point, b: Point) -> bool {
        if scene.graph.counted_len() > 0 {
            return false;
        }
        let (a, b) = (scene.bounds.clamp(a), scene.bounds.clamp(b));
        let (min, max) = (Point::new(a.x.min(b.x), a.y.min(b.y)), Point::new(a.x.max(b.x), a.y.max(b.y)));
        if max.x - min.x <= 0.0 || max.y - min.y <= 0.0 {
            tracing::debug!("drag box has no area; ignored");
            return false;
        }

        for corner in Corner::ALL {
            let p = match corner {
                Corner::TopLeft => min,
                Corner::TopRight => Point::new(max.x, min.y),
                Corner::BottomRight => max,
                Corner::BottomLeft => Point::new(min.x, max.y),
            };
            scene.graph.add_node(p, NodeRole::RectangleCorner { corner });
        }
        scene.graph.close_ring();
        constraint::refresh_width_label(&mut scene.graph, scene.image.width);
        tracing::info!(width = max.x - min.x, height = max.y - min.y, "selection rectangle created");
        true
    }

    fn hit_test(&self, scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
        hit::corner_hit(&scene.graph, at, handle_radius).or_else(|| hit::interior_hit(&scene.graph, at))
    }

    fn style(&self) -> Style {
        Style {
            node: NodeStyle { diameter: 4.0, shape: NodeShape::Square, color: BLUE, font_size: 0.0, label_offset_y: 0.0 },
            edge: EdgeStyle { width: 4.0, color: BLUE, font_size: 20.0, font_weight: 600, label_offset_y: -26.0 },
        }
    }
}

// =============================================================
// Line
// =============================================================

/// A polygon plus one full-width reference line seeded at mid-height.
pub struct LineHandler;

impl TaskHandler for LineHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Line
    }

    fn on_image_loaded(&self, scene: &mut Scene) -> Result<(), MoveRejected> {
        let image = scene.image;
        scene.lines.seed(&mut scene.graph, image)?;
        Ok(())
    }

    fn place(&self, scene: &mut Scene, at: Point) -> Option<NodeId> {
        place_ring_dot(scene, at)
    }

    fn hit_test(&self, scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
        line_hit(scene, at, handle_radius)
    }

    fn overlay_fill(&self) -> Option<&'static str> {
        Some(LINE_FILL)
    }

    fn style(&self) -> Style {
        polygon_style()
    }
}

// =============================================================
// Lines
// =============================================================

/// A polygon plus one or two reference lines clipped to it, seeded when the
/// ring closes.
pub struct LinesHandler;

impl TaskHandler for LinesHandler {
    fn kind(&self) -> TaskKind {
        TaskKind::Lines
    }

    fn place(&self, scene: &mut Scene, at: Point) -> Option<NodeId> {
        let id = place_ring_dot(scene, at)?;
        if scene.graph.is_full() {
            let image = scene.image;
            if let Err(err) = scene.lines.seed(&mut scene.graph, image) {
                tracing::warn!(%err, "could not seed clipped lines");
            }
        }
        Some(id)
    }

    fn hit_test(&self, scene: &Scene, at: Point, handle_radius: f64) -> Option<Hit> {
        line_hit(scene, at, handle_radius)
    }

    fn overlay_fill(&self) -> Option<&'static str> {
        Some(LINE_FILL)
    }

    fn style(&self) -> Style {
        polygon_style()
    }
}
