//! Geometric annotation engine for images.
//!
//! This crate is compiled to WebAssembly and runs in the browser. A session
//! annotates one image for one task (free points, a polygon, a rectangle
//! selection, or a polygon with reference lines). The engine turns raw pointer
//! and wheel input into constrained edits of a small shape graph, keeps the
//! viewport fitted and clamped, and produces a draw list for each frame. The
//! host layer only wires DOM events in and applies the returned
//! [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`task`] | Task configuration and validation |
//! | [`handler`] | Per-task placement, hit priority, seeding and style |
//! | [`graph`] | Nodes, roles, edges and ring order |
//! | [`constraint`] | Border inset, atomic group moves, rectangle symmetry |
//! | [`lines`] | Full-width and ring-clipped reference lines |
//! | [`geom`] | Point/polygon/segment primitives |
//! | [`viewport`] | Fit-to-container zoom, pan clamping, minimap frame |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`hit`] | Hit probes and cursors |
//! | [`render`] | Pure draw-list construction |
//! | [`paint`] | Replays a draw list onto a 2D canvas context |
//! | [`export`] | Absolute and fractional position export |
//! | [`consts`] | Shared numeric constants (hit radii, zoom limits, defaults) |

pub mod consts;
pub mod constraint;
pub mod engine;
pub mod export;
pub mod geom;
pub mod graph;
pub mod handler;
pub mod hit;
pub mod input;
pub mod lines;
pub mod paint;
pub mod render;
pub mod task;
pub mod viewport;
