//! The immutable answer key of a puzzle.

use super::{ShapeMismatch, EMPTY_CELL};

/// Per-cell palette indices produced by the quantizer.
///
/// Every cell is either [`EMPTY_CELL`] or an index of the palette the grid
/// was quantized with. The grid never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGrid {
    width: usize,
    height: usize,
    cells: Vec<u8>,
}

impl TargetGrid {
    /// Wrap row-major cells, checking that `cells.len() == width * height`.
    ///
    /// Dimensions whose product overflows report `expected: usize::MAX`.
    pub fn from_cells(width: usize, height: usize, cells: Vec<u8>) -> Result<Self, ShapeMismatch> {
        let expected = width.saturating_mul(height);
        if cells.len() != expected {
            return Err(ShapeMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self::from_parts(width, height, cells))
    }

    pub(crate) fn from_parts(width: usize, height: usize, cells: Vec<u8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major cell values.
    #[inline]
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Number of cells carrying `index`.
    pub fn count_of(&self, index: u8) -> usize {
        self.cells.iter().filter(|&&c| c == index).count()
    }

    /// Number of cells that belong to the artwork.
    pub fn paintable_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY_CELL).count()
    }

    /// Cell count per index value, indexed by the value itself.
    pub fn color_counts(&self) -> [usize; 256] {
        let mut counts = [0usize; 256];
        for &c in &self.cells {
            counts[c as usize] += 1;
        }
        counts
    }
}
