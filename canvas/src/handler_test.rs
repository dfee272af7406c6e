#![allow(clippy::float_cmp)]

use super::*;
use crate::graph::{EdgeKind, RoleKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn scene_for(task: Task, image: Size) -> (Scene, Box<dyn TaskHandler>) {
    let handler = handler_for(task.kind);
    let mut scene = Scene::new(task);
    scene.set_image(image);
    handler.on_image_loaded(&mut scene).unwrap();
    (scene, handler)
}

fn square(task: Task) -> (Scene, Box<dyn TaskHandler>) {
    let (mut scene, handler) = scene_for(task, Size::new(400.0, 200.0));
    for p in [pt(100.0, 50.0), pt(200.0, 50.0), pt(200.0, 150.0), pt(100.0, 150.0)] {
        handler.place(&mut scene, p).unwrap();
    }
    (scene, handler)
}

// =============================================================
// Scene
// =============================================================

#[test]
fn scene_starts_without_image() {
    let scene = Scene::new(Task::polygon(3).unwrap());
    assert!(!scene.has_image());
    assert!(scene.graph.is_empty());
    assert_eq!(scene.graph.capacity(), 3);
}

#[test]
fn set_image_rebuilds_bounds() {
    let mut scene = Scene::new(Task::polygon(3).unwrap());
    scene.set_image(Size::new(400.0, 200.0));
    assert!(scene.has_image());
    assert_eq!(scene.bounds().clamp(pt(-10.0, 500.0)), pt(8.0, 196.0));
}

#[test]
fn handler_kinds_match_task() {
    for task in [
        Task::points(2).unwrap(),
        Task::polygon(3).unwrap(),
        Task::selection().unwrap(),
        Task::line(4).unwrap(),
        Task::lines(4, 1).unwrap(),
    ] {
        assert_eq!(handler_for(task.kind).kind(), task.kind);
    }
}

// =============================================================
// Placement
// =============================================================

#[test]
fn polygon_place_clamps_and_caps() {
    let (mut scene, handler) = scene_for(Task::polygon(2).unwrap(), Size::new(400.0, 200.0));
    assert!(handler.place(&mut scene, pt(500.0, 100.0)).is_some());
    assert_eq!(scene.graph.ring_positions(), vec![pt(392.0, 100.0)]);
    assert!(handler.place(&mut scene, pt(50.0, 50.0)).is_some());
    assert!(handler.place(&mut scene, pt(60.0, 60.0)).is_none());
    assert_eq!(scene.graph.counted_len(), 2);
}

#[test]
fn polygon_ring_closes_at_cap() {
    let (scene, _) = square(Task::polygon(4).unwrap());
    let ids = scene.graph.ring_ids();
    let pairs: Vec<_> = scene.graph.edges().iter().map(|e| (e.source, e.target)).collect();
    assert_eq!(pairs, vec![(ids[0], ids[1]), (ids[1], ids[2]), (ids[2], ids[3]), (ids[3], ids[0])]);
}

#[test]
fn points_connect_only_when_full() {
    let (mut scene, handler) = scene_for(Task::points(4).unwrap(), Size::new(400.0, 200.0));
    for p in [pt(50.0, 50.0), pt(150.0, 50.0), pt(250.0, 50.0)] {
        handler.place(&mut scene, p);
    }
    assert!(scene.graph.edges().is_empty());
    handler.place(&mut scene, pt(350.0, 50.0));
    assert_eq!(scene.graph.edges().len(), 6);
    assert!(scene.graph.edges().iter().all(|e| e.kind == EdgeKind::Pair));
}

#[test]
fn selection_never_places_on_click() {
    let (mut scene, handler) = scene_for(Task::selection().unwrap(), Size::new(400.0, 200.0));
    assert!(handler.uses_drag_box());
    assert!(handler.place(&mut scene, pt(50.0, 50.0)).is_none());
    assert!(scene.graph.is_empty());
}

// =============================================================
// Selection box
// =============================================================

#[test]
fn complete_box_builds_labelled_rectangle() {
    let (mut scene, handler) = scene_for(Task::selection().unwrap(), Size::new(400.0, 200.0));
    assert!(handler.complete_box(&mut scene, pt(150.0, 120.0), pt(50.0, 50.0)));

    let corners: Vec<Point> = Corner::ALL.iter().map(|c| scene.graph.corner(*c).unwrap().position).collect();
    assert_eq!(corners, vec![pt(50.0, 50.0), pt(150.0, 50.0), pt(150.0, 120.0), pt(50.0, 120.0)]);
    assert_eq!(scene.graph.edges().len(), 4);
    let top = &scene.graph.edges()[0];
    assert_eq!(top.source, scene.graph.corner(Corner::TopLeft).unwrap().id);
    assert_eq!(top.label.as_deref(), Some("100px \u{2014} 25%"));
    assert!(scene.graph.edges()[1..].iter().all(|e| e.label.is_none()));
}

#[test]
fn complete_box_clamps_to_bounds() {
    let (mut scene, handler) = scene_for(Task::selection().unwrap(), Size::new(400.0, 200.0));
    assert!(handler.complete_box(&mut scene, pt(-50.0, -50.0), pt(100.0, 100.0)));
    assert_eq!(scene.graph.corner(Corner::TopLeft).unwrap().position, pt(8.0, 4.0));
}

#[test]
fn flat_box_ignored() {
    let (mut scene, handler) = scene_for(Task::selection().unwrap(), Size::new(400.0, 200.0));
    assert!(!handler.complete_box(&mut scene, pt(50.0, 50.0), pt(150.0, 50.0)));
    // Both points clamp onto the same border line.
    assert!(!handler.complete_box(&mut scene, pt(-10.0, 10.0), pt(-20.0, 80.0)));
    assert!(scene.graph.is_empty());
}

#[test]
fn complete_box_runs_once() {
    let (mut scene, handler) = scene_for(Task::selection().unwrap(), Size::new(400.0, 200.0));
    assert!(handler.complete_box(&mut scene, pt(50.0, 50.0), pt(150.0, 120.0)));
    assert!(!handler.complete_box(&mut scene, pt(10.0, 10.0), pt(20.0, 20.0)));
    assert_eq!(scene.graph.len(), 4);
}

// =============================================================
// Line seeding
// =============================================================

#[test]
fn line_seeds_on_image_load() {
    let (scene, _) = scene_for(Task::line(4).unwrap(), Size::new(400.0, 200.0));
    assert!(scene.lines.is_seeded());
    assert_eq!(scene.graph.nodes_by_role(RoleKind::LineEndpoint).len(), 2);
    assert_eq!(scene.graph.pivot(0).unwrap().position, pt(200.0, 100.0));
    assert_eq!(scene.graph.counted_len(), 0);
}

#[test]
fn polygon_load_creates_nothing() {
    let (scene, _) = scene_for(Task::polygon(3).unwrap(), Size::new(400.0, 200.0));
    assert!(scene.graph.is_empty());
}

#[test]
fn lines_seed_when_ring_closes() {
    let (mut scene, handler) = scene_for(Task::lines(4, 1).unwrap(), Size::new(400.0, 200.0));
    assert!(!scene.lines.is_seeded());
    for p in [pt(100.0, 50.0), pt(300.0, 50.0), pt(300.0, 150.0)] {
        handler.place(&mut scene, p);
    }
    assert!(!scene.lines.is_seeded());
    handler.place(&mut scene, pt(100.0, 150.0));
    assert!(scene.lines.is_seeded());
    assert_eq!(scene.graph.pivot(0).unwrap().position, pt(200.0, 100.0));
    assert_eq!(scene.graph.edges().iter().filter(|e| e.kind == EdgeKind::Line).count(), 1);
}

// =============================================================
// Hit priority
// =============================================================

#[test]
fn polygon_vertex_beats_interior() {
    let (scene, handler) = square(Task::polygon(4).unwrap());
    let id = scene.graph.ring_ids()[0];
    assert_eq!(handler.hit_test(&scene, pt(102.0, 52.0), 5.0), Some(Hit::Vertex { id }));
    assert_eq!(handler.hit_test(&scene, pt(150.0, 100.0), 5.0), Some(Hit::Interior));
    assert_eq!(handler.hit_test(&scene, pt(300.0, 100.0), 5.0), None);
}

#[test]
fn points_have_no_interior() {
    let (scene, handler) = square(Task::points(4).unwrap());
    assert_eq!(handler.hit_test(&scene, pt(150.0, 100.0), 5.0), None);
}

#[test]
fn pivot_beats_line_body_and_ring() {
    let (mut scene, handler) = scene_for(Task::line(4).unwrap(), Size::new(400.0, 200.0));
    for p in [pt(100.0, 50.0), pt(300.0, 50.0), pt(300.0, 150.0), pt(100.0, 150.0)] {
        handler.place(&mut scene, p);
    }
    // Inside the ring, on the line, within the pivot radius.
    assert_eq!(handler.hit_test(&scene, pt(220.0, 100.0), 5.0), Some(Hit::Pivot { line: 0 }));
    // On the line, outside the pivot radius.
    assert_eq!(handler.hit_test(&scene, pt(20.0, 100.0), 5.0), Some(Hit::LineBody { line: 0 }));
    // Inside the ring, off the line and far from the pivot.
    assert_eq!(handler.hit_test(&scene, pt(110.0, 140.0), 5.0), Some(Hit::Interior));
}

#[test]
fn selection_corner_beats_interior() {
    let (mut scene, handler) = scene_for(Task::selection().unwrap(), Size::new(400.0, 200.0));
    handler.complete_box(&mut scene, pt(50.0, 50.0), pt(150.0, 120.0));
    assert_eq!(handler.hit_test(&scene, pt(148.0, 121.0), 5.0), Some(Hit::Corner { corner: Corner::BottomRight }));
    assert_eq!(handler.hit_test(&scene, pt(100.0, 80.0), 5.0), Some(Hit::Interior));
}

// =============================================================
// Style
// =============================================================

#[test]
fn overlay_colours_per_task() {
    assert_eq!(handler_for(TaskKind::Polygon).overlay_fill(), Some("rgba(0, 0, 255, 0.1)"));
    assert_eq!(handler_for(TaskKind::Line).overlay_fill(), Some("rgba(255, 255, 0, 0.1)"));
    assert_eq!(handler_for(TaskKind::Lines).overlay_fill(), Some("rgba(255, 255, 0, 0.1)"));
    assert_eq!(handler_for(TaskKind::Points).overlay_fill(), None);
    assert_eq!(handler_for(TaskKind::Selection).overlay_fill(), None);
}

#[test]
fn selection_uses_square_handles() {
    let style = handler_for(TaskKind::Selection).style();
    assert_eq!(style.node.shape, NodeShape::Square);
    assert_eq!(style.edge.font_weight, 600);
}
