//! Viewport: pan/zoom over the image, coordinate conversion, and pan clamping.
//!
//! `pan` is the screen position (CSS pixels) of the image origin; `zoom` is
//! screen pixels per image pixel. Screen and world (image-pixel) space relate
//! by `screen = world * zoom + pan`.
//!
//! The visible frame never shows area outside the image: after every pan or
//! zoom the pan is clamped so the image edges stay at or beyond the container
//! edges. An axis on which the scaled image is smaller than the container is
//! pinned to 0.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::Serialize;

use crate::consts::{MAX_ZOOM, WHEEL_ZOOM_SENSITIVITY};
use crate::geom::{Point, Size};

/// Zoom at which the whole image fits inside the container.
#[must_use]
pub fn fit_zoom(image: Size, container: Size) -> f64 {
    if image.is_empty() || container.is_empty() {
        return 1.0;
    }
    (container.width / image.width).min(container.height / image.height)
}

/// Visible image rectangle expressed in minimap coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MinimapFrame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pan: Point,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
    image: Size,
    container: Size,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Size::default())
    }
}

impl Viewport {
    /// A viewport with no image yet: unit zoom, zero pan.
    #[must_use]
    pub fn new(container: Size) -> Self {
        Self { pan: Point::default(), zoom: 1.0, min_zoom: 1.0, max_zoom: MAX_ZOOM, image: Size::default(), container }
    }

    #[must_use]
    pub fn pan(&self) -> Point {
        self.pan
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    #[must_use]
    pub fn min_zoom(&self) -> f64 {
        self.min_zoom
    }

    #[must_use]
    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    #[must_use]
    pub fn image_size(&self) -> Size {
        self.image
    }

    #[must_use]
    pub fn container_size(&self) -> Size {
        self.container
    }

    /// On-screen size of the image at the current zoom.
    #[must_use]
    pub fn rendered_size(&self) -> Size {
        Size::new(self.image.width * self.zoom, self.image.height * self.zoom)
    }

    // --- Coordinate conversion ---

    /// Convert a screen-space point (CSS pixels) to image-pixel coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point::new((screen.x - self.pan.x) / self.zoom, (screen.y - self.pan.y) / self.zoom)
    }

    /// Convert an image-pixel point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point::new(world.x * self.zoom + self.pan.x, world.y * self.zoom + self.pan.y)
    }

    /// Convert a screen-space distance (pixels) to an image-space distance.
    #[must_use]
    pub fn screen_dist_to_world(&self, screen_dist: f64) -> f64 {
        screen_dist / self.zoom
    }

    /// Factor applied to handle sizes, stroke widths and label fonts so they
    /// keep a constant on-screen size.
    #[must_use]
    pub fn handle_scale(&self) -> f64 {
        1.0 / self.zoom
    }

    // --- Mutation ---

    /// Adopt a newly loaded image: zoom to fit and reset pan.
    pub fn set_image(&mut self, image: Size) {
        self.image = image;
        self.min_zoom = fit_zoom(image, self.container);
        self.max_zoom = MAX_ZOOM.max(self.min_zoom);
        self.zoom = self.min_zoom;
        self.pan = Point::default();
        self.clamp_pan();
    }

    /// Resize the container. Min zoom is recomputed and the current zoom
    /// raised to it if needed.
    pub fn set_container(&mut self, container: Size) {
        self.container = container;
        if !self.image.is_empty() {
            self.min_zoom = fit_zoom(self.image, container);
            self.max_zoom = MAX_ZOOM.max(self.min_zoom);
            self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        }
        self.clamp_pan();
    }

    /// Set zoom to `zoom` (clamped) keeping the image point under `anchor` fixed.
    /// Returns whether pan or zoom changed.
    pub fn zoom_at(&mut self, anchor: Point, zoom: f64) -> bool {
        if !zoom.is_finite() {
            return false;
        }
        let before = (self.pan, self.zoom);
        let world = self.screen_to_world(anchor);
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        self.pan = Point::new(anchor.x - world.x * self.zoom, anchor.y - world.y * self.zoom);
        self.clamp_pan();
        before != (self.pan, self.zoom)
    }

    /// Zoom in response to a wheel tick; negative `dy` zooms in.
    pub fn zoom_by_wheel(&mut self, anchor: Point, dy: f64) -> bool {
        let factor = (-dy * WHEEL_ZOOM_SENSITIVITY).exp();
        self.zoom_at(anchor, self.zoom * factor)
    }

    /// Shift pan by a screen-space delta, then clamp. Returns whether pan changed.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> bool {
        let before = self.pan;
        self.pan = self.pan.offset(dx, dy);
        self.clamp_pan();
        before != self.pan
    }

    /// Snap pan back so no area outside the image is visible.
    pub fn clamp_pan(&mut self) {
        let rendered = self.rendered_size();
        self.pan = Point::new(
            clamp_axis(self.pan.x, rendered.width, self.container.width),
            clamp_axis(self.pan.y, rendered.height, self.container.height),
        );
    }

    // --- Minimap ---

    /// Scale from image pixels to a minimap `minimap_width` pixels wide.
    #[must_use]
    pub fn minimap_scale(&self, minimap_width: f64) -> f64 {
        if self.image.width > 0.0 { minimap_width / self.image.width } else { 0.0 }
    }

    /// The visible part of the image, in minimap coordinates.
    #[must_use]
    pub fn minimap_frame(&self, scale: f64) -> MinimapFrame {
        MinimapFrame {
            left: (self.pan.x / self.zoom).abs() * scale,
            top: (self.pan.y / self.zoom).abs() * scale,
            width: self.container.width / self.zoom * scale,
            height: self.container.height / self.zoom * scale,
        }
    }
}

fn clamp_axis(pan: f64, rendered: f64, container: f64) -> f64 {
    if rendered <= container {
        return 0.0;
    }
    pan.clamp(container - rendered, 0.0)
}
