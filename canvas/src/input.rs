//! Input model: mouse buttons, wheel deltas, and the gesture state machine.
//!
//! `InputState` is the active gesture tracked between pointer-down and
//! pointer-up. Exactly one variant is live at a time, so two manipulations can
//! never run together. Each variant carries the context its move handler needs
//! (previous screen position for delta-based drags, first contact for
//! rotation, the anchor corner for a drag box).

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::Deserialize;

use crate::geom::Point;
use crate::graph::{Corner, NodeId};

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    #[default]
    Primary,
    /// Middle mouse button.
    Middle,
    /// Right mouse button.
    Secondary,
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    #[serde(default)]
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down, zooms out).
    pub dy: f64,
}

/// An in-progress selection drag box, in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marquee {
    pub anchor: Point,
    pub current: Point,
}

impl Marquee {
    /// Top-left and bottom-right corners from the min/max of both points.
    #[must_use]
    pub fn normalized(&self) -> (Point, Point) {
        (
            Point::new(self.anchor.x.min(self.current.x), self.anchor.y.min(self.current.y)),
            Point::new(self.anchor.x.max(self.current.x), self.anchor.y.max(self.current.y)),
        )
    }
}

/// UI state visible to the renderer and the host.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    /// Background panning is allowed (off while a shape gesture runs).
    pub pan_enabled: bool,
    /// Box selection is allowed (off while a shape gesture runs).
    pub box_select_enabled: bool,
    /// Cursor last sent to the host.
    pub cursor: &'static str,
    /// Drag box being drawn, if any.
    pub marquee: Option<Marquee>,
}

impl Default for UiState {
    fn default() -> Self {
        Self { pan_enabled: true, box_select_enabled: true, cursor: crate::hit::DEFAULT_CURSOR, marquee: None }
    }
}

/// The gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next pointer-down.
    #[default]
    Idle,
    /// Dragging the background to pan the viewport.
    Panning {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// A node was just placed; waits for pointer-up.
    PlacingNode {
        /// The appended node.
        id: NodeId,
    },
    /// Drawing the selection drag box.
    DrawingBox {
        /// Image-space corner where the drag started (already clamped).
        anchor: Point,
    },
    /// Translating the whole polygon ring.
    DraggingPolygon {
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Moving a single free dot.
    DraggingVertex { id: NodeId },
    /// Resizing the selection rectangle by one corner.
    DraggingRectangleCorner { corner: Corner },
    /// Translating a reference line vertically.
    DraggingLineBody {
        line: usize,
        /// Screen position of the previous pointer event.
        last_screen: Point,
    },
    /// Rotating a reference line about its pivot.
    RotatingLine {
        line: usize,
        /// Image-space pointer position when the gesture started.
        first_contact: Point,
    },
}

impl InputState {
    /// Whether a shape (not the viewport) is being manipulated.
    #[must_use]
    pub fn is_shape_gesture(&self) -> bool {
        !matches!(self, Self::Idle | Self::Panning { .. })
    }
}
