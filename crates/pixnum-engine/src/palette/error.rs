//! Error types for palette operations

use thiserror::Error;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    #[error("invalid hex color length (expected 3 or 6 characters)")]
    InvalidLength,
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0:?}")]
    InvalidHex(char),
}

/// Error type for palette validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// No entries provided
    #[error("palette cannot be empty")]
    EmptyPalette,
    /// More entries than a puzzle palette may carry
    #[error("palette has {len} entries (max {max})")]
    TooManyEntries { len: usize, max: usize },
    /// Index 0 is reserved for cells outside the artwork
    #[error("palette index 0 is reserved")]
    ReservedIndex,
    /// The same index appears twice
    #[error("duplicate palette index {index}")]
    DuplicateIndex { index: u8 },
    /// Unknown built-in palette name
    #[error("unknown palette: {0}")]
    UnknownPalette(String),
    /// Invalid hex color string
    #[error("invalid color: {0}")]
    ParseColor(#[from] ParseColorError),
}
