//! Puzzle grids and paint-state.
//!
//! - [`TargetGrid`]: immutable answer key from the quantizer
//! - [`PaintState`]: the mutable painted layer and its progress accounting
//! - [`next_incomplete()`]: the color-advance selector

mod counts;
mod paint_state;
mod selector;
mod target;

pub use counts::{ColorProgress, ProgressSnapshot, ShapeMismatch};
pub use paint_state::PaintState;
pub use selector::next_incomplete;
pub use target::TargetGrid;

/// Cell value for "not part of the artwork".
pub const EMPTY_CELL: u8 = 0;
