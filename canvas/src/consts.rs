//! Shared numeric constants for the canvas crate.

// ── Hit-testing ─────────────────────────────────────────────────

/// Radius around a ring vertex, in image pixels, where a click counts as
/// "on the vertex" rather than "inside the polygon".
pub const VERTEX_EXCLUSION_RADIUS: f64 = 5.0;

/// Slack added to the segment length when testing whether a point lies on a
/// line body, in image pixels.
pub const LINE_HIT_EPSILON: f64 = 2.0;

/// Default hit radius around a rotation pivot, in image pixels.
pub const DEFAULT_PIVOT_HIT_RADIUS: f64 = 75.0;

/// Screen-space hit slop in pixels for rectangle corner handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Lines ───────────────────────────────────────────────────────

/// Vertical distance from the ring centroid to each probe line when two
/// clipped lines are seeded.
pub const LINES_PROBE_OFFSET: f64 = 75.0;

/// Slopes closer than this are treated as parallel.
pub const PARALLEL_EPSILON: f64 = 1e-9;

// ── Viewport ────────────────────────────────────────────────────

/// Upper zoom limit.
pub const MAX_ZOOM: f64 = 10.0;

/// Wheel delta (pixels) to zoom exponent scale.
pub const WHEEL_ZOOM_SENSITIVITY: f64 = 0.001;

// ── Task defaults ───────────────────────────────────────────────

/// Default fraction of each image dimension kept off-limits for placement.
pub const DEFAULT_BORDER_INSET_FRACTION: f64 = 0.02;

/// A selection rectangle always has four corners.
pub const RECTANGLE_CORNER_COUNT: usize = 4;
