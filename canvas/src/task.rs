//! Task configuration: which annotation the user is asked to produce.
//!
//! A `Task` is chosen once per session and never mutated. It decides the node
//! cap, the border inset, and which handler drives hit-testing and placement.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BORDER_INSET_FRACTION, DEFAULT_PIVOT_HIT_RADIUS, RECTANGLE_CORNER_COUNT};

/// The kind of annotation a session produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Free points, all-pairs connected once complete.
    Points,
    /// A closed polygon ring.
    Polygon,
    /// An axis-aligned rectangle drawn with a drag box.
    Selection,
    /// A polygon plus one full-width rotatable reference line.
    Line,
    /// A polygon plus one or two reference lines clipped to it.
    Lines,
}

/// Errors produced when validating a task configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TaskError {
    #[error("required node count must be at least 1")]
    ZeroNodes,

    #[error("border inset fraction {0} outside [0, 0.5)")]
    InsetOutOfRange(f64),

    #[error("lines task needs a line count of 1 or 2, got {0:?}")]
    LineCount(Option<u8>),

    #[error("selection task needs exactly 4 nodes, got {0}")]
    SelectionCorners(usize),

    #[error("pivot hit radius must be positive, got {0}")]
    PivotRadius(f64),
}

fn default_inset() -> f64 {
    DEFAULT_BORDER_INSET_FRACTION
}

fn default_pivot_radius() -> f64 {
    DEFAULT_PIVOT_HIT_RADIUS
}

/// Immutable per-session task configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub kind: TaskKind,
    /// Cap on counted nodes (free dots or rectangle corners).
    pub required_node_count: usize,
    /// Fraction of each image dimension kept off-limits near the edges.
    #[serde(default = "default_inset")]
    pub border_inset_fraction: f64,
    /// Number of clipped lines for [`TaskKind::Lines`].
    #[serde(default)]
    pub line_count: Option<u8>,
    /// Hit radius around a rotation pivot, in image pixels.
    #[serde(default = "default_pivot_radius")]
    pub pivot_hit_radius: f64,
}

impl Task {
    /// Build and validate a task with the default pivot radius.
    ///
    /// # Errors
    ///
    /// Returns a [`TaskError`] when the combination is not usable.
    pub fn new(
        kind: TaskKind,
        required_node_count: usize,
        border_inset_fraction: f64,
        line_count: Option<u8>,
    ) -> Result<Self, TaskError> {
        let task = Self {
            kind,
            required_node_count,
            border_inset_fraction,
            line_count,
            pivot_hit_radius: DEFAULT_PIVOT_HIT_RADIUS,
        };
        task.validate()?;
        Ok(task)
    }

    /// # Errors
    ///
    /// Returns a [`TaskError`] for a zero node cap, an inset outside
    /// `[0, 0.5)`, a bad line count, or a non-positive pivot radius.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.required_node_count == 0 {
            return Err(TaskError::ZeroNodes);
        }
        if !(0.0..0.5).contains(&self.border_inset_fraction) {
            return Err(TaskError::InsetOutOfRange(self.border_inset_fraction));
        }
        if !(self.pivot_hit_radius.is_finite() && self.pivot_hit_radius > 0.0) {
            return Err(TaskError::PivotRadius(self.pivot_hit_radius));
        }
        match self.kind {
            TaskKind::Selection if self.required_node_count != RECTANGLE_CORNER_COUNT => {
                Err(TaskError::SelectionCorners(self.required_node_count))
            }
            TaskKind::Lines if !matches!(self.line_count, Some(1 | 2)) => Err(TaskError::LineCount(self.line_count)),
            _ => Ok(()),
        }
    }

    /// # Errors
    ///
    /// See [`Task::validate`].
    pub fn points(count: usize) -> Result<Self, TaskError> {
        Self::new(TaskKind::Points, count, DEFAULT_BORDER_INSET_FRACTION, None)
    }

    /// # Errors
    ///
    /// See [`Task::validate`].
    pub fn polygon(count: usize) -> Result<Self, TaskError> {
        Self::new(TaskKind::Polygon, count, DEFAULT_BORDER_INSET_FRACTION, None)
    }

    /// # Errors
    ///
    /// See [`Task::validate`].
    pub fn selection() -> Result<Self, TaskError> {
        Self::new(TaskKind::Selection, RECTANGLE_CORNER_COUNT, DEFAULT_BORDER_INSET_FRACTION, None)
    }

    /// # Errors
    ///
    /// See [`Task::validate`].
    pub fn line(count: usize) -> Result<Self, TaskError> {
        Self::new(TaskKind::Line, count, DEFAULT_BORDER_INSET_FRACTION, None)
    }

    /// # Errors
    ///
    /// See [`Task::validate`].
    pub fn lines(count: usize, line_count: u8) -> Result<Self, TaskError> {
        Self::new(TaskKind::Lines, count, DEFAULT_BORDER_INSET_FRACTION, Some(line_count))
    }

    /// Same task with a different border inset.
    ///
    /// # Errors
    ///
    /// See [`Task::validate`].
    pub fn with_inset(self, border_inset_fraction: f64) -> Result<Self, TaskError> {
        let task = Self { border_inset_fraction, ..self };
        task.validate()?;
        Ok(task)
    }

    /// Whether discrete clicks place nodes (everything except the drag-box selection).
    #[must_use]
    pub fn allows_placement(&self) -> bool {
        !matches!(self.kind, TaskKind::Selection)
    }

    /// Whether a filled overlay is drawn once the ring is complete.
    #[must_use]
    pub fn fills_ring(&self) -> bool {
        matches!(self.kind, TaskKind::Polygon | TaskKind::Line | TaskKind::Lines)
    }

    /// Number of reference lines this task manages.
    #[must_use]
    pub fn line_total(&self) -> usize {
        match self.kind {
            TaskKind::Line => 1,
            TaskKind::Lines => usize::from(self.line_count.unwrap_or(0)),
            _ => 0,
        }
    }
}
