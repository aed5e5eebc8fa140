//! Grid paint-state: the player's painted layer over a target grid.

use super::counts::{ColorProgress, ProgressSnapshot, ShapeMismatch};
use super::selector::next_incomplete;
use super::target::TargetGrid;
use super::EMPTY_CELL;
use crate::palette::Palette;

/// What a single-cell paint attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellOutcome {
    /// The cell changed to the selected color
    Painted,
    /// The cell already had the selected color
    Unchanged,
    /// Out of bounds, not paintable, or the wrong color
    Rejected,
}

/// Owns a target grid and the painted grid of the same shape.
///
/// Invariant: every painted cell is either [`EMPTY_CELL`] or equal to its
/// target cell. [`paint_if_matches()`](Self::paint_if_matches) is the only
/// way a cell becomes painted, and restored grids are sanitized on
/// [`apply_painted()`](Self::apply_painted).
///
/// Per-color counts are kept incrementally so progress queries are O(1).
///
/// # Example
///
/// ```
/// use pixnum_engine::PaintState;
///
/// let mut state = PaintState::configure(2, 2, vec![1, 1, 2, 2]).unwrap();
/// assert_eq!(state.paint_brush(0, 0, 0, 1), 1);
/// assert_eq!(state.painted(), &[1, 0, 0, 0]);
///
/// let progress = state.progress_for(1);
/// assert_eq!((progress.total, progress.painted), (2, 1));
/// ```
#[derive(Debug, Clone)]
pub struct PaintState {
    target: TargetGrid,
    painted: Vec<u8>,
    totals: [usize; 256],
    painted_counts: [usize; 256],
    paintable: usize,
    painted_total: usize,
}

impl PaintState {
    /// Install a target grid and an all-zero painted grid.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeMismatch`] when `target.len() != width * height`.
    pub fn configure(width: usize, height: usize, target: Vec<u8>) -> Result<Self, ShapeMismatch> {
        Ok(Self::from_target(TargetGrid::from_cells(
            width, height, target,
        )?))
    }

    /// Start an unpainted session over a quantizer result.
    pub fn from_target(target: TargetGrid) -> Self {
        let totals = target.color_counts();
        let paintable = target.paintable_count();
        let painted = vec![EMPTY_CELL; target.cells().len()];
        Self {
            target,
            painted,
            totals,
            painted_counts: [0; 256],
            paintable,
            painted_total: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.target.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.target.height()
    }

    pub fn target(&self) -> &TargetGrid {
        &self.target
    }

    /// Read-only view of the painted grid, row-major.
    pub fn painted(&self) -> &[u8] {
        &self.painted
    }

    /// Paint `(x, y)` with `selected` if that is the cell's target color.
    ///
    /// Returns `false` when the coordinates are outside the grid, the cell is
    /// not part of the artwork, or `selected` is the wrong color. Returns
    /// `true` when the cell ends up painted, including the case where it
    /// already was.
    pub fn paint_if_matches(&mut self, x: i64, y: i64, selected: u8) -> bool {
        match self.cell_index(x, y) {
            Some(idx) => self.paint_cell(idx, selected) != CellOutcome::Rejected,
            None => false,
        }
    }

    /// Paint the square `[cx - radius, cx + radius] x [cy - radius, cy + radius]`.
    ///
    /// Cells outside the grid are skipped. Returns how many cells changed
    /// from unpainted to painted in this call; a negative radius paints
    /// nothing.
    pub fn paint_brush(&mut self, cx: i64, cy: i64, radius: i64, selected: u8) -> usize {
        if radius < 0 {
            return 0;
        }
        let max_x = self.width() as i64 - 1;
        let max_y = self.height() as i64 - 1;
        let x0 = cx.saturating_sub(radius).max(0);
        let x1 = cx.saturating_add(radius).min(max_x);
        let y0 = cy.saturating_sub(radius).max(0);
        let y1 = cy.saturating_add(radius).min(max_y);

        let mut newly = 0;
        for y in y0..=y1 {
            for x in x0..=x1 {
                if let Some(idx) = self.cell_index(x, y) {
                    if self.paint_cell(idx, selected) == CellOutcome::Painted {
                        newly += 1;
                    }
                }
            }
        }
        newly
    }

    /// Replace the painted grid, e.g. with restored progress.
    ///
    /// A grid of the wrong length is rejected and the current state kept.
    /// Cells painted with anything other than their target color are
    /// cleared before the grid is installed.
    pub fn apply_painted(&mut self, mut grid: Vec<u8>) -> bool {
        let expected = self.painted.len();
        if grid.len() != expected {
            let err = ShapeMismatch {
                expected,
                actual: grid.len(),
            };
            tracing::warn!(%err, "Rejected painted grid");
            return false;
        }

        let mut cleared = 0usize;
        for (cell, &target) in grid.iter_mut().zip(self.target.cells()) {
            if *cell != EMPTY_CELL && *cell != target {
                *cell = EMPTY_CELL;
                cleared += 1;
            }
        }
        if cleared > 0 {
            tracing::warn!(cleared, "Cleared painted cells that did not match the target");
        }

        self.painted = grid;
        self.recount();
        true
    }

    /// Clear every painted cell.
    pub fn reset_painted(&mut self) {
        self.painted.fill(EMPTY_CELL);
        self.painted_counts = [0; 256];
        self.painted_total = 0;
    }

    /// Total and painted cells of `index`. Index 0 is not a color and
    /// always reports `(0, 0)`.
    pub fn progress_for(&self, index: u8) -> ColorProgress {
        if index == EMPTY_CELL {
            return ColorProgress::default();
        }
        ColorProgress::new(
            self.totals[index as usize],
            self.painted_counts[index as usize],
        )
    }

    /// Paintable and painted cells over the whole grid.
    pub fn overall_progress(&self) -> ColorProgress {
        ColorProgress::new(self.paintable, self.painted_total)
    }

    pub fn is_color_complete(&self, index: u8) -> bool {
        self.progress_for(index).is_complete()
    }

    /// Every paintable cell is painted (and there is at least one).
    pub fn is_complete(&self) -> bool {
        self.overall_progress().is_complete()
    }

    /// Next palette index after `current` with cells left to paint.
    pub fn next_incomplete(&self, palette: &Palette, current: u8) -> Option<u8> {
        next_incomplete(&palette.indices(), current, |i| self.progress_for(i))
    }

    /// Progress of every palette color plus the overall count.
    pub fn snapshot(&self, palette: &Palette, selected: u8) -> ProgressSnapshot {
        ProgressSnapshot {
            colors: palette
                .entries()
                .iter()
                .map(|e| (e.index, self.progress_for(e.index)))
                .collect(),
            overall: self.overall_progress(),
            selected,
        }
    }

    fn cell_index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(y * self.width() + x)
    }

    fn paint_cell(&mut self, idx: usize, selected: u8) -> CellOutcome {
        let target = self.target.cells()[idx];
        if target == EMPTY_CELL || target != selected {
            return CellOutcome::Rejected;
        }
        if self.painted[idx] == selected {
            return CellOutcome::Unchanged;
        }
        // By the invariant the cell was empty before this point.
        self.painted[idx] = selected;
        self.painted_counts[selected as usize] += 1;
        self.painted_total += 1;
        CellOutcome::Painted
    }

    fn recount(&mut self) {
        self.painted_counts = [0; 256];
        self.painted_total = 0;
        for &cell in &self.painted {
            if cell != EMPTY_CELL {
                self.painted_counts[cell as usize] += 1;
                self.painted_total += 1;
            }
        }
    }
}
