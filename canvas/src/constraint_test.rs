#![allow(clippy::float_cmp)]

use super::*;
use crate::graph::{NodeRole, RoleKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn bounds(w: f64, h: f64, inset: f64) -> Bounds {
    Bounds::new(Size::new(w, h), inset)
}

fn rectangle(points: [Point; 4]) -> ShapeGraph {
    let mut g = ShapeGraph::new(4);
    for (corner, p) in Corner::ALL.into_iter().zip(points) {
        g.add_node(p, NodeRole::RectangleCorner { corner });
    }
    g.close_ring();
    g
}

fn unit_rectangle() -> ShapeGraph {
    rectangle([pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 10.0), pt(0.0, 10.0)])
}

fn corner_at(g: &ShapeGraph, c: Corner) -> Point {
    g.corner(c).unwrap().position
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn clamp_respects_inset() {
    let b = bounds(100.0, 200.0, 0.1);
    assert_eq!(b.clamp(pt(0.0, 0.0)), pt(10.0, 20.0));
    assert_eq!(b.clamp(pt(500.0, 500.0)), pt(90.0, 180.0));
    assert_eq!(b.clamp(pt(50.0, 50.0)), pt(50.0, 50.0));
}

#[test]
fn availability_is_clamp_identity() {
    let b = bounds(100.0, 100.0, 0.1);
    assert!(b.is_available(pt(10.0, 90.0)));
    assert!(!b.is_available(pt(9.9, 50.0)));
}

#[test]
fn pinned_availability_allows_edges_in_x() {
    let b = bounds(100.0, 100.0, 0.1);
    assert!(b.is_available_pinned(pt(0.0, 50.0)));
    assert!(b.is_available_pinned(pt(100.0, 50.0)));
    assert!(!b.is_available_pinned(pt(100.0, 95.0)));
    assert!(!b.is_available_pinned(pt(101.0, 50.0)));
}

// =============================================================
// Group translation
// =============================================================

fn polygon_near_border() -> (ShapeGraph, Vec<NodeId>) {
    let mut g = ShapeGraph::new(3);
    g.add_node(pt(15.0, 50.0), NodeRole::FreeDot);
    g.add_node(pt(50.0, 20.0), NodeRole::FreeDot);
    g.add_node(pt(60.0, 60.0), NodeRole::FreeDot);
    g.close_ring();
    let ids = g.ring_ids();
    (g, ids)
}

#[test]
fn translation_applies_to_all_members() {
    let (mut g, ids) = polygon_near_border();
    let b = bounds(100.0, 100.0, 0.1);
    assert!(validate_group_translation(&g, &ids, 2.0, 3.0, &b));
    apply_group_translation(&mut g, &ids, 2.0, 3.0);
    assert_eq!(g.ring_positions(), vec![pt(17.0, 53.0), pt(52.0, 23.0), pt(62.0, 63.0)]);
}

#[test]
fn translation_rejected_atomically() {
    let (mut g, ids) = polygon_near_border();
    let before = g.ring_positions();
    let b = bounds(100.0, 100.0, 0.1);
    // Only the first vertex would cross x = 10.
    assert!(!validate_group_translation(&g, &ids, -6.0, 0.0, &b));
    let err = translate_group(&mut g, &ids, -6.0, 0.0, &b).unwrap_err();
    assert!(matches!(err, MoveRejected::OutOfBounds { .. }));
    assert_eq!(g.ring_positions(), before);
}

#[test]
fn translation_missing_node_rejected() {
    let (mut g, mut ids) = polygon_near_border();
    ids.push(uuid::Uuid::new_v4());
    let b = bounds(100.0, 100.0, 0.0);
    assert!(!validate_group_translation(&g, &ids, 1.0, 1.0, &b));
    assert_eq!(translate_group(&mut g, &ids, 1.0, 1.0, &b), Err(MoveRejected::MissingNode));
}

// =============================================================
// Free node
// =============================================================

#[test]
fn free_node_move_checks_bounds() {
    let (mut g, ids) = polygon_near_border();
    let b = bounds(100.0, 100.0, 0.1);
    assert!(move_free_node(&mut g, &ids[0], pt(95.0, 50.0), &b).is_err());
    assert_eq!(g.node(&ids[0]).unwrap().position, pt(15.0, 50.0));
    assert!(move_free_node(&mut g, &ids[0], pt(30.0, 40.0), &b).is_ok());
    assert_eq!(g.node(&ids[0]).unwrap().position, pt(30.0, 40.0));
}

// =============================================================
// Rectangle corners
// =============================================================

#[test]
fn top_left_move_keeps_rectangle() {
    let mut g = unit_rectangle();
    move_rectangle_corner(&mut g, Corner::TopLeft, pt(2.0, 2.0), &bounds(100.0, 100.0, 0.0)).unwrap();
    assert_eq!(corner_at(&g, Corner::TopLeft), pt(2.0, 2.0));
    assert_eq!(corner_at(&g, Corner::TopRight), pt(10.0, 2.0));
    assert_eq!(corner_at(&g, Corner::BottomLeft), pt(2.0, 10.0));
    assert_eq!(corner_at(&g, Corner::BottomRight), pt(10.0, 10.0));
}

#[test]
fn bottom_right_move_keeps_rectangle() {
    let mut g = unit_rectangle();
    move_rectangle_corner(&mut g, Corner::BottomRight, pt(20.0, 15.0), &bounds(100.0, 100.0, 0.0)).unwrap();
    assert_eq!(corner_at(&g, Corner::TopRight), pt(20.0, 0.0));
    assert_eq!(corner_at(&g, Corner::BottomLeft), pt(0.0, 15.0));
    assert_eq!(corner_at(&g, Corner::TopLeft), pt(0.0, 0.0));
}

#[test]
fn every_corner_move_keeps_axis_alignment() {
    for c in Corner::ALL {
        let mut g = rectangle([pt(20.0, 20.0), pt(60.0, 20.0), pt(60.0, 60.0), pt(20.0, 60.0)]);
        move_rectangle_corner(&mut g, c, pt(33.0, 44.0), &bounds(100.0, 100.0, 0.0)).unwrap();
        let tl = corner_at(&g, Corner::TopLeft);
        let tr = corner_at(&g, Corner::TopRight);
        let br = corner_at(&g, Corner::BottomRight);
        let bl = corner_at(&g, Corner::BottomLeft);
        assert_eq!(tl.y, tr.y);
        assert_eq!(bl.y, br.y);
        assert_eq!(tl.x, bl.x);
        assert_eq!(tr.x, br.x);
    }
}

#[test]
fn corner_move_rejected_when_neighbour_leaves_bounds() {
    let mut g = rectangle([pt(20.0, 20.0), pt(60.0, 20.0), pt(60.0, 60.0), pt(20.0, 60.0)]);
    let before: Vec<Point> = g.nodes_by_role(RoleKind::RectangleCorner).iter().map(|n| n.position).collect();
    let err = move_rectangle_corner(&mut g, Corner::TopLeft, pt(5.0, 30.0), &bounds(100.0, 100.0, 0.1));
    assert!(err.is_err());
    let after: Vec<Point> = g.nodes_by_role(RoleKind::RectangleCorner).iter().map(|n| n.position).collect();
    assert_eq!(before, after);
}

#[test]
fn corner_move_on_empty_graph_is_missing() {
    let mut g = ShapeGraph::new(4);
    let err = move_rectangle_corner(&mut g, Corner::TopLeft, pt(1.0, 1.0), &bounds(10.0, 10.0, 0.0));
    assert_eq!(err, Err(MoveRejected::MissingNode));
}

// =============================================================
// Width label
// =============================================================

#[test]
fn width_label_format() {
    assert_eq!(width_label(100.0, 400.0), "100px \u{2014} 25%");
    assert_eq!(width_label(33.4, 100.0), "33px \u{2014} 33%");
}

#[test]
fn width_label_tracks_resize() {
    let mut g = unit_rectangle();
    assert!(refresh_width_label(&mut g, 40.0));
    assert_eq!(g.edges()[0].label.as_deref(), Some("10px \u{2014} 25%"));

    move_rectangle_corner(&mut g, Corner::TopRight, pt(20.0, 0.0), &bounds(100.0, 100.0, 0.0)).unwrap();
    assert!(refresh_width_label(&mut g, 40.0));
    assert_eq!(g.edges()[0].label.as_deref(), Some("20px \u{2014} 50%"));
}

#[test]
fn width_label_needs_edges() {
    let mut g = ShapeGraph::new(4);
    for c in Corner::ALL {
        g.add_node(pt(1.0, 1.0), NodeRole::RectangleCorner { corner: c });
    }
    assert!(!refresh_width_label(&mut g, 10.0));
}
