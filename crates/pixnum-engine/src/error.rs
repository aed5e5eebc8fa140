//! Unified error type for the engine's public API.

use thiserror::Error;

use crate::grid::ShapeMismatch;
use crate::palette::{PaletteError, ParseColorError};
use crate::progress::{CodecError, StoreError};
use crate::quantize::ConversionError;

/// Wraps every engine error for convenient `?` propagation.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    #[error("color parse error: {0}")]
    ParseColor(#[from] ParseColorError),

    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    #[error("shape mismatch: {0}")]
    Shape(#[from] ShapeMismatch),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_palette() -> Result<crate::Palette, EngineError> {
        Ok(crate::Palette::builtin("sepia")?)
    }

    #[test]
    fn test_question_mark_conversion() {
        let err = make_palette().unwrap_err();
        assert!(matches!(err, EngineError::Palette(_)));
        assert_eq!(err.to_string(), "palette error: unknown palette: sepia");
    }

    #[test]
    fn test_shape_error_message() {
        let err: EngineError = ShapeMismatch {
            expected: 4,
            actual: 2,
        }
        .into();
        assert_eq!(err.to_string(), "shape mismatch: grid has 2 cells, expected 4");
    }
}
