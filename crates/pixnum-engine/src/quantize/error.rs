//! Conversion failures.

use thiserror::Error;

/// Reasons a source image could not be turned into a target grid.
///
/// All variants belong to the decode-failure category: no grid is produced
/// and the puzzle never becomes interactive.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("image dimensions cannot be zero ({width}x{height})")]
    ZeroDimension { width: usize, height: usize },

    #[error("row stride {stride} is smaller than {min} bytes")]
    StrideTooSmall { stride: usize, min: usize },

    #[error("pixel buffer has {len} bytes, {required} required")]
    BufferTooShort { len: usize, required: usize },

    #[error("source image not found: {0}")]
    SourceMissing(String),

    #[error("failed to decode source image: {0}")]
    Decode(String),
}
