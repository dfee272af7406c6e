//! Rendering: builds the draw list for one frame.
//!
//! Rendering is a pure function of the scene, the viewport and the UI state.
//! It produces [`DrawCmd`]s in paint order and mutates nothing, so calling it
//! twice without an intervening event yields identical lists. Replaying the
//! list onto a browser canvas is [`crate::paint`]'s job.
//!
//! Node sizes, stroke widths and label fonts are given in screen pixels by the
//! task style and divided by the zoom here so they keep a constant on-screen
//! size.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::geom::{Point, Size};
use crate::graph::{EdgeKind, NodeRole};
use crate::handler::{Scene, TaskHandler};
use crate::input::UiState;
use crate::viewport::Viewport;

/// Marquee stroke colour.
const MARQUEE_STROKE: &str = "#1E90FF";
/// Marquee fill colour.
const MARQUEE_FILL: &str = "rgba(30, 144, 255, 0.12)";
/// Background behind edge labels.
const LABEL_BACKGROUND: &str = "white";
/// Reference line stroke colour.
const LINE_STROKE: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Ellipse,
    Square,
}

/// Node appearance in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStyle {
    pub diameter: f64,
    pub shape: NodeShape,
    pub color: &'static str,
    /// Index label font size; 0 disables node labels.
    pub font_size: f64,
    pub label_offset_y: f64,
}

/// Edge appearance in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeStyle {
    pub width: f64,
    pub color: &'static str,
    pub font_size: f64,
    pub font_weight: u16,
    pub label_offset_y: f64,
}

/// Per-task stylesheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub node: NodeStyle,
    pub edge: EdgeStyle,
}

/// One paint instruction. Coordinates after [`DrawCmd::Transform`] are in
/// image space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Clear the container, in screen pixels.
    Clear { size: Size },
    /// Set the world-to-screen transform.
    Transform { zoom: f64, pan: Point },
    /// Draw the background image at the origin.
    Image { size: Size },
    /// Filled ring overlay.
    FillPolygon { points: Vec<Point>, color: &'static str },
    Segment { from: Point, to: Point, width: f64, color: &'static str },
    Node { center: Point, diameter: f64, shape: NodeShape, color: &'static str },
    Label { at: Point, text: String, font: String, color: &'static str, background: Option<&'static str> },
    Marquee { origin: Point, size: Size, line_width: f64, stroke: &'static str, fill: &'static str },
}

/// Build the draw list for the current state.
#[must_use]
pub fn render_scene(scene: &Scene, viewport: &Viewport, ui: &UiState, handler: &dyn TaskHandler) -> Vec<DrawCmd> {
    let scale = viewport.handle_scale();
    let style = handler.style();
    let mut out = vec![
        DrawCmd::Clear { size: viewport.container_size() },
        DrawCmd::Transform { zoom: viewport.zoom(), pan: viewport.pan() },
    ];

    if !scene.has_image() {
        return out;
    }
    out.push(DrawCmd::Image { size: scene.image() });

    if let Some(color) = handler.overlay_fill() {
        let ring = scene.graph.ring_positions();
        if scene.task.fills_ring() && scene.graph.is_full() && ring.len() >= 3 {
            out.push(DrawCmd::FillPolygon { points: ring, color });
        }
    }

    push_edges(&mut out, scene, &style.edge, scale);
    push_nodes(&mut out, scene, &style.node, scale);

    if let Some(m) = ui.marquee {
        let (min, max) = m.normalized();
        out.push(DrawCmd::Marquee {
            origin: min,
            size: Size::new(max.x - min.x, max.y - min.y),
            line_width: scale,
            stroke: MARQUEE_STROKE,
            fill: MARQUEE_FILL,
        });
    }
    out
}

fn font(size: f64, weight: u16) -> String {
    format!("{weight} {size:.2}px sans-serif")
}

fn push_edges(out: &mut Vec<DrawCmd>, scene: &Scene, style: &EdgeStyle, scale: f64) {
    for edge in scene.graph.edges() {
        let (Some(a), Some(b)) = (scene.graph.node(&edge.source), scene.graph.node(&edge.target)) else {
            continue;
        };
        let color = if edge.kind == EdgeKind::Line { LINE_STROKE } else { style.color };
        out.push(DrawCmd::Segment { from: a.position, to: b.position, width: style.width * scale, color });

        if let Some(text) = &edge.label {
            let mid = a.position.midpoint(b.position);
            out.push(DrawCmd::Label {
                at: mid.offset(0.0, style.label_offset_y * scale),
                text: text.clone(),
                font: font(style.font_size * scale, style.font_weight),
                color: style.color,
                background: Some(LABEL_BACKGROUND),
            });
        }
    }
}

fn push_nodes(out: &mut Vec<DrawCmd>, scene: &Scene, style: &NodeStyle, scale: f64) {
    let mut index = 0;
    for node in scene.graph.nodes() {
        let color = match node.role {
            NodeRole::LineEndpoint { .. } | NodeRole::RotationPivot { .. } => LINE_STROKE,
            NodeRole::FreeDot | NodeRole::RectangleCorner { .. } => style.color,
        };
        out.push(DrawCmd::Node { center: node.position, diameter: style.diameter * scale, shape: style.shape, color });

        if node.role == NodeRole::FreeDot && style.font_size > 0.0 {
            index += 1;
            out.push(DrawCmd::Label {
                at: node.position.offset(0.0, style.label_offset_y * scale),
                text: index.to_string(),
                font: font(style.font_size * scale, 400),
                color: style.color,
                background: None,
            });
        }
    }
}
