//! Progress counters and shape errors shared by the grid types.

use thiserror::Error;

/// A grid or restore buffer whose length differs from `width * height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("grid has {actual} cells, expected {expected}")]
pub struct ShapeMismatch {
    pub expected: usize,
    pub actual: usize,
}

/// Total and painted cell counts for one color or the whole grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorProgress {
    pub total: usize,
    pub painted: usize,
}

impl ColorProgress {
    pub fn new(total: usize, painted: usize) -> Self {
        Self { total, painted }
    }

    /// Has cells, and all of them are painted.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.painted >= self.total
    }

    /// Has cells left to paint.
    pub fn is_incomplete(&self) -> bool {
        self.total > 0 && self.painted < self.total
    }

    /// Painted share in `0.0..=1.0`; `0.0` for a color with no cells.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.painted as f64 / self.total as f64
        }
    }
}

/// Derived view of a session's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    /// Per-color progress in palette order
    pub colors: Vec<(u8, ColorProgress)>,
    /// All paintable cells
    pub overall: ColorProgress,
    /// Currently selected palette index
    pub selected: u8,
}
