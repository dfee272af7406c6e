#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

/// 400x200 image in an 800x300 container: fit zoom is 1.5 (height-bound).
fn loaded() -> Viewport {
    let mut vp = Viewport::new(Size::new(800.0, 300.0));
    vp.set_image(Size::new(400.0, 200.0));
    vp
}

// --- Defaults ---

#[test]
fn new_viewport_is_identity() {
    let vp = Viewport::new(Size::new(100.0, 100.0));
    assert_eq!(vp.zoom(), 1.0);
    assert_eq!(vp.pan(), Point::default());
    assert!(point_approx_eq(vp.screen_to_world(Point::new(5.0, 7.0)), Point::new(5.0, 7.0)));
}

// --- Fit / min zoom ---

#[test]
fn fit_zoom_picks_smaller_axis() {
    assert!(approx_eq(fit_zoom(Size::new(400.0, 200.0), Size::new(800.0, 300.0)), 1.5));
    assert!(approx_eq(fit_zoom(Size::new(1000.0, 500.0), Size::new(500.0, 500.0)), 0.5));
}

#[test]
fn fit_zoom_without_image_is_one() {
    assert_eq!(fit_zoom(Size::default(), Size::new(10.0, 10.0)), 1.0);
}

#[test]
fn set_image_zooms_to_fit() {
    let vp = loaded();
    assert!(approx_eq(vp.zoom(), 1.5));
    assert!(approx_eq(vp.min_zoom(), 1.5));
    assert_eq!(vp.max_zoom(), MAX_ZOOM);
    assert_eq!(vp.pan(), Point::default());
}

// --- Conversion ---

#[test]
fn screen_world_round_trip() {
    let mut vp = loaded();
    vp.zoom_at(Point::new(400.0, 150.0), 4.0);
    let world = Point::new(123.0, 45.0);
    assert!(point_approx_eq(vp.screen_to_world(vp.world_to_screen(world)), world));
}

#[test]
fn screen_dist_scales_by_zoom() {
    let vp = loaded();
    assert!(approx_eq(vp.screen_dist_to_world(15.0), 10.0));
    assert!(approx_eq(vp.handle_scale(), 1.0 / 1.5));
}

// --- Zoom ---

#[test]
fn zoom_clamped_to_range() {
    let mut vp = loaded();
    vp.zoom_at(Point::default(), 0.1);
    assert!(approx_eq(vp.zoom(), 1.5));
    vp.zoom_at(Point::default(), 1000.0);
    assert_eq!(vp.zoom(), MAX_ZOOM);
}

#[test]
fn zoom_keeps_anchor_fixed() {
    let mut vp = loaded();
    let anchor = Point::new(300.0, 150.0);
    let before = vp.screen_to_world(anchor);
    assert!(vp.zoom_at(anchor, 3.0));
    assert!(point_approx_eq(vp.screen_to_world(anchor), before));
}

#[test]
fn zoom_at_min_is_no_change() {
    let mut vp = loaded();
    assert!(!vp.zoom_at(Point::new(10.0, 10.0), 0.5));
}

#[test]
fn wheel_up_zooms_in() {
    let mut vp = loaded();
    assert!(vp.zoom_by_wheel(Point::new(100.0, 100.0), -500.0));
    assert!(vp.zoom() > 1.5);
}

#[test]
fn non_finite_zoom_ignored() {
    let mut vp = loaded();
    assert!(!vp.zoom_at(Point::default(), f64::NAN));
    assert!(approx_eq(vp.zoom(), 1.5));
}

// --- Pan clamp ---

#[test]
fn pan_pinned_when_image_smaller_than_container() {
    let mut vp = loaded();
    // Rendered 600x300 in 800x300: neither axis overflows.
    assert!(!vp.pan_by(-50.0, -50.0));
    assert_eq!(vp.pan(), Point::default());
}

#[test]
fn pan_clamped_to_image_edges() {
    let mut vp = loaded();
    vp.zoom_at(Point::default(), 3.0);
    // Rendered 1200x600 in 800x300.
    vp.pan_by(-10_000.0, -10_000.0);
    assert!(point_approx_eq(vp.pan(), Point::new(-400.0, -300.0)));
    vp.pan_by(10_000.0, 10_000.0);
    assert!(point_approx_eq(vp.pan(), Point::default()));
}

#[test]
fn pan_within_range_applies() {
    let mut vp = loaded();
    vp.zoom_at(Point::default(), 3.0);
    assert!(vp.pan_by(-100.0, -20.0));
    assert!(point_approx_eq(vp.pan(), Point::new(-100.0, -20.0)));
}

// --- Container resize ---

#[test]
fn container_resize_raises_min_zoom() {
    let mut vp = loaded();
    vp.set_container(Size::new(1600.0, 600.0));
    assert!(approx_eq(vp.min_zoom(), 3.0));
    assert!(approx_eq(vp.zoom(), 3.0));
}

#[test]
fn container_resize_keeps_zoom_and_reclamps() {
    let mut vp = loaded();
    vp.zoom_at(Point::default(), 4.0);
    vp.pan_by(-10_000.0, 0.0);
    assert!(approx_eq(vp.pan().x, -800.0));
    vp.set_container(Size::new(1200.0, 300.0));
    assert!(approx_eq(vp.zoom(), 4.0));
    // Rendered width 1600 in 1200: pan can go no further than -400.
    assert!(approx_eq(vp.pan().x, -400.0));
}

// --- Minimap ---

#[test]
fn minimap_frame_at_fit() {
    let vp = loaded();
    let scale = vp.minimap_scale(100.0);
    assert!(approx_eq(scale, 0.25));
    let frame = vp.minimap_frame(scale);
    assert!(approx_eq(frame.left, 0.0));
    assert!(approx_eq(frame.width, 800.0 / 1.5 * 0.25));
}

#[test]
fn minimap_frame_follows_pan() {
    let mut vp = loaded();
    vp.zoom_at(Point::default(), 3.0);
    vp.pan_by(-300.0, -150.0);
    let frame = vp.minimap_frame(0.5);
    assert!(approx_eq(frame.left, 50.0));
    assert!(approx_eq(frame.top, 25.0));
    assert!(approx_eq(frame.width, 800.0 / 3.0 * 0.5));
    assert!(approx_eq(frame.height, 50.0));
}

#[test]
fn minimap_scale_without_image_is_zero() {
    assert_eq!(Viewport::default().minimap_scale(100.0), 0.0);
}
