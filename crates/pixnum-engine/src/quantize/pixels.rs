//! Decoded RGBA pixel buffer.

use super::error::ConversionError;
use crate::color::Rgba;

const BYTES_PER_PIXEL: usize = 4;

/// A decoded RGBA image, consumed once by the quantizer.
///
/// Rows may be padded: pixel `(x, y)` starts at byte `y * stride + x * 4`.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA bytes with an explicit row stride.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::ZeroDimension`] if either dimension is 0
    /// - [`ConversionError::StrideTooSmall`] if `stride < width * 4`
    /// - [`ConversionError::BufferTooShort`] if the last row does not fit
    pub fn new(
        width: usize,
        height: usize,
        stride: usize,
        data: Vec<u8>,
    ) -> Result<Self, ConversionError> {
        if width == 0 || height == 0 {
            return Err(ConversionError::ZeroDimension { width, height });
        }
        let row_bytes = width.saturating_mul(BYTES_PER_PIXEL);
        if stride < row_bytes {
            return Err(ConversionError::StrideTooSmall {
                stride,
                min: row_bytes,
            });
        }
        let required = stride.saturating_mul(height - 1).saturating_add(row_bytes);
        if data.len() < required {
            return Err(ConversionError::BufferTooShort {
                len: data.len(),
                required,
            });
        }

        Ok(Self {
            width,
            height,
            stride,
            data,
        })
    }

    /// Wrap tightly packed RGBA bytes (`stride == width * 4`).
    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ConversionError> {
        Self::new(width, height, width.saturating_mul(BYTES_PER_PIXEL), data)
    }

    /// Build a buffer from a row-major pixel slice.
    pub fn from_pixels(
        width: usize,
        height: usize,
        pixels: &[Rgba],
    ) -> Result<Self, ConversionError> {
        let data = pixels.iter().flat_map(|p| [p.r, p.g, p.b, p.a]).collect();
        Self::from_rgba(width, height, data)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixel at `(x, y)`. Coordinates must be in bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        let off = y * self.stride + x * BYTES_PER_PIXEL;
        Rgba::new(
            self.data[off],
            self.data[off + 1],
            self.data[off + 2],
            self.data[off + 3],
        )
    }
}
