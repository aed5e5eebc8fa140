//! Quantizer -- maps source pixels onto palette indices.

use super::background::BackgroundMask;
use super::error::ConversionError;
use super::options::QuantizeOptions;
use super::pixels::PixelBuffer;
use crate::grid::{TargetGrid, EMPTY_CELL};
use crate::palette::Palette;

/// Converts pixel buffers into target grids for one palette.
///
/// The quantizer is reusable across images and holds no per-image state.
///
/// # Example
///
/// ```
/// use pixnum_engine::{Palette, PixelBuffer, Quantizer, Rgba};
///
/// let white = Rgba::new(255, 255, 255, 255);
/// let black = Rgba::new(0, 0, 0, 255);
/// let buffer = PixelBuffer::from_pixels(3, 1, &[white, black, white]).unwrap();
///
/// let grid = Quantizer::new(Palette::classic()).convert(&buffer).unwrap();
/// assert_eq!(grid.cells(), &[0, 9, 0]);
/// ```
#[derive(Debug, Clone)]
pub struct Quantizer {
    palette: Palette,
    options: QuantizeOptions,
}

impl Quantizer {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            options: QuantizeOptions::default(),
        }
    }

    /// Override the default thresholds.
    #[inline]
    pub fn options(mut self, options: QuantizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Convert a decoded pixel buffer into a target grid.
    ///
    /// Background-connected pixels and pixels with alpha below the
    /// threshold become [`EMPTY_CELL`]; every other pixel gets the nearest
    /// palette index. The output is row-major with the buffer's dimensions.
    pub fn convert(&self, buffer: &PixelBuffer) -> Result<TargetGrid, ConversionError> {
        let width = buffer.width();
        let height = buffer.height();
        if width == 0 || height == 0 {
            return Err(ConversionError::ZeroDimension { width, height });
        }

        let mask = BackgroundMask::build(buffer, &self.options);
        let mut cells = vec![EMPTY_CELL; width * height];

        for y in 0..height {
            for x in 0..width {
                if mask.is_background(x, y) {
                    continue;
                }
                let pixel = buffer.pixel(x, y);
                if pixel.a < self.options.alpha_threshold {
                    continue;
                }
                cells[y * width + x] = self.palette.find_nearest(pixel.rgb());
            }
        }

        tracing::debug!(
            width,
            height,
            background = mask.count(),
            "Quantized pixel buffer"
        );

        Ok(TargetGrid::from_parts(width, height, cells))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Rgb, Rgba};
    use crate::palette::PaletteEntry;

    const W: Rgba = Rgba::new(255, 255, 255, 255);
    const K: Rgba = Rgba::new(0, 0, 0, 255);
    const T: Rgba = Rgba::new(255, 0, 0, 0);

    fn bw() -> Palette {
        Palette::new(vec![
            PaletteEntry::new(1, Rgb::new(0, 0, 0)),
            PaletteEntry::new(2, Rgb::new(255, 255, 255)),
        ])
        .unwrap()
    }

    #[test]
    fn test_enclosed_white_keeps_its_index() {
        #[rustfmt::skip]
        let pixels = [
            W, K, K, K, W,
            W, K, W, K, W,
            W, K, K, K, W,
        ];
        let buffer = PixelBuffer::from_pixels(5, 3, &pixels).unwrap();
        let grid = Quantizer::new(bw()).convert(&buffer).unwrap();

        #[rustfmt::skip]
        assert_eq!(grid.cells(), &[
            0, 1, 1, 1, 0,
            0, 1, 2, 1, 0,
            0, 1, 1, 1, 0,
        ]);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 3);
    }

    #[test]
    fn test_interior_transparent_pixel_is_empty() {
        // The transparent pixel is enclosed, so the fill never reaches it.
        #[rustfmt::skip]
        let pixels = [
            K, K, K,
            K, T, K,
            K, K, K,
        ];
        let buffer = PixelBuffer::from_pixels(3, 3, &pixels).unwrap();
        let grid = Quantizer::new(bw()).convert(&buffer).unwrap();
        assert_eq!(grid.cells(), &[1, 1, 1, 1, 0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_nearest_color_in_classic_palette() {
        let pixels = [
            Rgba::new(120, 130, 125, 255), // grey -> 1
            Rgba::new(10, 10, 240, 255),   // blue -> 2
            Rgba::new(250, 160, 10, 255),  // orange -> 3
            Rgba::new(230, 20, 20, 255),   // red -> 4
            Rgba::new(20, 20, 20, 255),    // black -> 9
        ];
        let buffer = PixelBuffer::from_pixels(5, 1, &pixels).unwrap();
        let grid = Quantizer::new(Palette::classic()).convert(&buffer).unwrap();
        assert_eq!(grid.cells(), &[1, 2, 3, 4, 9]);
    }

    #[test]
    fn test_custom_thresholds() {
        let light = Rgba::new(230, 230, 230, 255);
        let buffer = PixelBuffer::from_pixels(1, 1, &[light]).unwrap();

        let default = Quantizer::new(bw()).convert(&buffer).unwrap();
        assert_eq!(default.cells(), &[2]);

        let loose = Quantizer::new(bw())
            .options(QuantizeOptions::new().white_threshold(220))
            .convert(&buffer)
            .unwrap();
        assert_eq!(loose.cells(), &[0]);
    }

    #[test]
    fn test_semi_transparent_pixel_is_quantized() {
        let faint = Rgba::new(0, 0, 0, 10);
        let buffer = PixelBuffer::from_pixels(1, 1, &[faint]).unwrap();
        let grid = Quantizer::new(bw()).convert(&buffer).unwrap();
        assert_eq!(grid.cells(), &[1]);
    }
}
