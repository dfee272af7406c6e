use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use crate::consts::{HANDLE_RADIUS_PX, VERTEX_EXCLUSION_RADIUS};
use crate::constraint::{self, MoveRejected};
use crate::export::{self, NodePositions};
use crate::geom::{self, Point, Size};
use crate::graph::{Corner, NodeId, RoleKind};
use crate::handler::{Scene, TaskHandler, handler_for};
use crate::hit::{DEFAULT_CURSOR, Hit};
use crate::input::{Button, InputState, Marquee, UiState, WheelDelta};
use crate::lines::LineMode;
use crate::paint;
use crate::render::{self, DrawCmd};
use crate::task::{Task, TaskError};
use crate::viewport::{MinimapFrame, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Node geometry changed; carries the full export.
    PositionsChanged(NodePositions),
    SetCursor(String),
    /// Enable or disable the host's own pan / box-select controls.
    SetUserPanning(bool),
    ViewportChanged { pan_x: f64, pan_y: f64, zoom: f64 },
    RenderNeeded,
}

/// Errors surfaced to the caller. Rejected moves are not errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("image has no area: {width}x{height}")]
    EmptyImage { width: f64, height: f64 },

    #[error("no image loaded")]
    NoImage,

    #[error("invalid task: {0}")]
    Task(#[from] TaskError),
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub scene: Scene,
    pub viewport: Viewport,
    pub ui: UiState,
    pub input: InputState,
    handler: Box<dyn TaskHandler>,
}

impl EngineCore {
    /// Start a session for `task` in a container of `container` CSS pixels.
    /// The engine stays inert until an image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Task`] when the task fails validation.
    pub fn new(task: Task, container: Size) -> Result<Self, EngineError> {
        task.validate()?;
        Ok(Self {
            scene: Scene::new(task),
            viewport: Viewport::new(container),
            ui: UiState::default(),
            input: InputState::Idle,
            handler: handler_for(task.kind),
        })
    }

    // --- Session ---

    /// Adopt the decoded image size. Loading a second image starts a fresh
    /// annotation over it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyImage`] when either dimension is not positive.
    pub fn on_image_loaded(&mut self, width: f64, height: f64) -> Result<Vec<Action>, EngineError> {
        let size = Size::new(width, height);
        if size.is_empty() {
            return Err(EngineError::EmptyImage { width, height });
        }
        if self.scene.has_image() {
            self.scene.reset();
            self.input = InputState::Idle;
            self.ui.marquee = None;
        }

        self.scene.set_image(size);
        self.viewport.set_image(size);
        if let Err(err) = self.handler.on_image_loaded(&mut self.scene) {
            tracing::warn!(%err, "task setup failed");
        }
        tracing::info!(width, height, task = ?self.scene.task.kind, "image loaded");

        let mut actions = vec![self.viewport_action()];
        actions.extend(self.changed());
        Ok(actions)
    }

    /// Clear all annotation state, keeping the image and task.
    pub fn reset(&mut self) -> Vec<Action> {
        self.scene.reset();
        self.input = InputState::Idle;
        self.ui = UiState::default();
        if self.scene.has_image() {
            if let Err(err) = self.handler.on_image_loaded(&mut self.scene) {
                tracing::warn!(%err, "task setup failed");
            }
        }
        tracing::info!("session reset");
        vec![
            Action::SetUserPanning(true),
            Action::SetCursor(DEFAULT_CURSOR.to_owned()),
            Action::PositionsChanged(self.positions()),
            Action::RenderNeeded,
        ]
    }

    /// Resize the container.
    pub fn set_container(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport.set_container(Size::new(width, height));
        vec![self.viewport_action(), Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if !self.scene.has_image() || button != Button::Primary || self.input != InputState::Idle {
            return Vec::new();
        }
        let world = self.viewport.screen_to_world(screen);
        let mut actions = Vec::new();

        self.input = match self.handler.hit_test(&self.scene, world, self.handle_radius()) {
            Some(Hit::Pivot { line }) => InputState::RotatingLine { line, first_contact: world },
            Some(Hit::LineBody { line }) => InputState::DraggingLineBody { line, last_screen: screen },
            Some(Hit::Corner { corner }) => InputState::DraggingRectangleCorner { corner },
            Some(Hit::Vertex { id }) => InputState::DraggingVertex { id },
            Some(Hit::Interior) => InputState::DraggingPolygon { last_screen: screen },
            None => self.press_empty(screen, world, &mut actions),
        };

        if self.input.is_shape_gesture() {
            tracing::debug!(state = ?self.input, "gesture started");
            self.ui.pan_enabled = false;
            self.ui.box_select_enabled = false;
            actions.insert(0, Action::SetUserPanning(false));
        }
        actions
    }

    /// Pointer-down that hit nothing: start a drag box, place a node, or pan.
    fn press_empty(&mut self, screen: Point, world: Point, actions: &mut Vec<Action>) -> InputState {
        if self.handler.uses_drag_box() && self.scene.graph.counted_len() == 0 && self.ui.box_select_enabled {
            let anchor = self.scene.bounds().clamp(world);
            self.ui.marquee = Some(Marquee { anchor, current: anchor });
            actions.push(Action::RenderNeeded);
            return InputState::DrawingBox { anchor };
        }
        if self.scene.task.allows_placement() {
            if let Some(id) = self.handler.place(&mut self.scene, world) {
                self.scene.lines.resync(&mut self.scene.graph);
                actions.extend(self.changed());
                return InputState::PlacingNode { id };
            }
        }
        if self.ui.pan_enabled {
            return InputState::Panning { last_screen: screen };
        }
        InputState::Idle
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if !self.scene.has_image() {
            return Vec::new();
        }
        let world = self.viewport.screen_to_world(screen);

        match self.input {
            InputState::Idle => self.hover(world),
            InputState::PlacingNode { .. } => Vec::new(),
            InputState::Panning { last_screen } => {
                self.input = InputState::Panning { last_screen: screen };
                if self.viewport.pan_by(screen.x - last_screen.x, screen.y - last_screen.y) {
                    vec![self.viewport_action(), Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
            InputState::DrawingBox { anchor } => {
                self.ui.marquee = Some(Marquee { anchor, current: self.scene.bounds().clamp(world) });
                vec![Action::RenderNeeded]
            }
            InputState::DraggingPolygon { last_screen } => {
                self.input = InputState::DraggingPolygon { last_screen: screen };
                let zoom = self.viewport.zoom();
                let (dx, dy) = ((screen.x - last_screen.x) / zoom, (screen.y - last_screen.y) / zoom);
                let result = self.drag_polygon(dx, dy);
                self.settle(result)
            }
            InputState::DraggingVertex { id } => {
                let result = self.drag_vertex(id, world);
                self.settle(result)
            }
            InputState::DraggingRectangleCorner { corner } => {
                let result = self.drag_corner(corner, world);
                self.settle(result)
            }
            InputState::DraggingLineBody { line, last_screen } => {
                self.input = InputState::DraggingLineBody { line, last_screen: screen };
                let dy = (screen.y - last_screen.y) / self.viewport.zoom();
                let bounds = self.scene.bounds();
                let result = self.scene.lines.translate(&mut self.scene.graph, line, dy, &bounds);
                self.settle(result)
            }
            InputState::RotatingLine { line, first_contact } => {
                let bounds = self.scene.bounds();
                let result =
                    self.scene.lines.rotate(&mut self.scene.graph, line, first_contact, world, &bounds).map(|_| ());
                self.settle(result)
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        let world = self.viewport.screen_to_world(screen);
        let mut actions = Vec::new();

        match self.input {
            InputState::DrawingBox { anchor } => {
                self.ui.marquee = None;
                let end = self.scene.bounds().clamp(world);
                if self.handler.complete_box(&mut self.scene, anchor, end) {
                    actions.extend(self.changed());
                } else {
                    actions.push(Action::RenderNeeded);
                }
            }
            InputState::RotatingLine { line, .. } => {
                self.scene.lines.commit(line);
                tracing::debug!(line, angle = ?self.scene.lines.angle(line), "rotation committed");
            }
            _ => {}
        }

        self.input = InputState::Idle;
        if !self.ui.pan_enabled {
            self.ui.pan_enabled = true;
            self.ui.box_select_enabled = true;
            actions.push(Action::SetUserPanning(true));
        }
        actions
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        if !self.scene.has_image() {
            return Vec::new();
        }
        if self.viewport.zoom_by_wheel(screen, delta.dy) {
            vec![self.viewport_action(), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Drag handlers ---

    fn drag_polygon(&mut self, dx: f64, dy: f64) -> Result<(), MoveRejected> {
        if !self.scene.graph.is_full() {
            return Err(MoveRejected::MissingNode);
        }
        let mut group = self.scene.graph.ring_ids();
        if self.scene.lines.mode() == LineMode::Clipped {
            group.extend(self.scene.graph.nodes_by_role(RoleKind::RotationPivot).iter().map(|n| n.id));
        }
        let bounds = self.scene.bounds();
        constraint::translate_group(&mut self.scene.graph, &group, dx, dy, &bounds)
    }

    fn drag_vertex(&mut self, id: NodeId, to: Point) -> Result<(), MoveRejected> {
        if self.scene.lines.mode() == LineMode::Clipped && self.scene.lines.is_seeded() {
            let ring: Vec<Point> =
                self.scene.graph.ring().iter().map(|n| if n.id == id { to } else { n.position }).collect();
            let pivots = self.scene.graph.nodes_by_role(RoleKind::RotationPivot);
            if pivots.iter().any(|p| !geom::ring_contains(&ring, p.position)) {
                return Err(MoveRejected::PivotOutsideRing);
            }
        }
        let bounds = self.scene.bounds();
        constraint::move_free_node(&mut self.scene.graph, &id, to, &bounds)
    }

    fn drag_corner(&mut self, corner: Corner, to: Point) -> Result<(), MoveRejected> {
        let bounds = self.scene.bounds();
        let image_width = self.scene.image().width;
        constraint::move_rectangle_corner(&mut self.scene.graph, corner, to, &bounds)?;
        constraint::refresh_width_label(&mut self.scene.graph, image_width);
        Ok(())
    }

    /// Turn a drag tick's outcome into actions. A missing node means the
    /// gesture's target is gone, so the gesture ends.
    fn settle(&mut self, result: Result<(), MoveRejected>) -> Vec<Action> {
        match result {
            Ok(()) => {
                self.scene.lines.resync(&mut self.scene.graph);
                self.changed()
            }
            Err(MoveRejected::MissingNode) => {
                tracing::debug!(state = ?self.input, "gesture target gone; ending gesture");
                self.input = InputState::Idle;
                self.ui.pan_enabled = true;
                self.ui.box_select_enabled = true;
                vec![Action::SetUserPanning(true)]
            }
            Err(err) => {
                tracing::debug!(%err, "move rejected");
                Vec::new()
            }
        }
    }

    fn hover(&mut self, world: Point) -> Vec<Action> {
        let cursor = self.handler.hit_test(&self.scene, world, self.handle_radius()).map_or(DEFAULT_CURSOR, Hit::cursor);
        if cursor == self.ui.cursor {
            return Vec::new();
        }
        self.ui.cursor = cursor;
        vec![Action::SetCursor(cursor.to_owned())]
    }

    fn changed(&self) -> Vec<Action> {
        vec![Action::PositionsChanged(self.positions()), Action::RenderNeeded]
    }

    fn viewport_action(&self) -> Action {
        let pan = self.viewport.pan();
        Action::ViewportChanged { pan_x: pan.x, pan_y: pan.y, zoom: self.viewport.zoom() }
    }

    /// Node grab radius in image units: the drawn node radius or the handle
    /// radius, whichever is larger, kept constant on screen.
    fn handle_radius(&self) -> f64 {
        let screen = (self.handler.style().node.diameter / 2.0).max(HANDLE_RADIUS_PX);
        (screen * self.viewport.handle_scale()).max(VERTEX_EXCLUSION_RADIUS)
    }

    // --- Queries ---

    /// Current positions, as sent with [`Action::PositionsChanged`].
    #[must_use]
    pub fn positions(&self) -> NodePositions {
        export::export_positions(&self.scene.graph, self.scene.image())
    }

    /// Final export for a session that has an image.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NoImage`] before an image is loaded.
    pub fn export(&self) -> Result<NodePositions, EngineError> {
        if !self.scene.has_image() {
            return Err(EngineError::NoImage);
        }
        Ok(self.positions())
    }

    /// Draw list for the current frame.
    #[must_use]
    pub fn render_scene(&self) -> Vec<DrawCmd> {
        render::render_scene(&self.scene, &self.viewport, &self.ui, self.handler.as_ref())
    }

    /// Visible region for a minimap `minimap_width` pixels wide.
    #[must_use]
    pub fn minimap_frame(&self, minimap_width: f64) -> MinimapFrame {
        self.viewport.minimap_frame(self.viewport.minimap_scale(minimap_width))
    }

    #[must_use]
    pub fn task(&self) -> Task {
        self.scene.task
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    image: Option<HtmlImageElement>,
    dpr: f64,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine bound to `canvas`, sized to its current CSS size.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Task`] when the task fails validation.
    pub fn new(canvas: HtmlCanvasElement, task: Task) -> Result<Self, EngineError> {
        let container = Size::new(f64::from(canvas.client_width()), f64::from(canvas.client_height()));
        Ok(Self { canvas, image: None, dpr: 1.0, core: EngineCore::new(task, container)? })
    }

    /// Adopt a decoded image element.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::EmptyImage`] when the element has no intrinsic size.
    pub fn set_image(&mut self, image: HtmlImageElement) -> Result<Vec<Action>, EngineError> {
        let actions = self.core.on_image_loaded(f64::from(image.natural_width()), f64::from(image.natural_height()))?;
        self.image = Some(image);
        Ok(actions)
    }

    /// Update container dimensions and device pixel ratio.
    pub fn set_viewport(&mut self, width_css: f64, height_css: f64, dpr: f64) -> Vec<Action> {
        self.dpr = dpr;
        self.core.set_container(width_css, height_css)
    }

    pub fn reset(&mut self) -> Vec<Action> {
        self.core.reset()
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        self.core.on_pointer_down(screen, button)
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        self.core.on_pointer_move(screen)
    }

    pub fn on_pointer_up(&mut self, screen: Point) -> Vec<Action> {
        self.core.on_pointer_up(screen)
    }

    pub fn on_wheel(&mut self, screen: Point, delta: WheelDelta) -> Vec<Action> {
        self.core.on_wheel(screen, delta)
    }

    // --- Render ---

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the 2D context is unavailable or a `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let ctx = self
            .canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        paint::paint(&ctx, &self.core.render_scene(), self.image.as_ref(), self.dpr)
    }

    // --- Delegated queries ---

    #[must_use]
    pub fn positions(&self) -> NodePositions {
        self.core.positions()
    }

    #[must_use]
    pub fn minimap_frame(&self, minimap_width: f64) -> MinimapFrame {
        self.core.minimap_frame(minimap_width)
    }
}
