//! Background segmentation.
//!
//! The canvas surrounding the artwork is found with a breadth-first,
//! 4-connected flood fill seeded from every border pixel. Only pixels that
//! qualify as background (near-white or almost transparent) are entered, so
//! white regions enclosed by artwork are left alone.

use std::collections::VecDeque;

use super::options::QuantizeOptions;
use super::pixels::PixelBuffer;
use crate::color::Rgba;

/// Row-major flags marking pixels that belong to the surrounding canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundMask {
    width: usize,
    height: usize,
    flags: Vec<bool>,
}

impl BackgroundMask {
    /// Flood-fill the background of `buffer`.
    pub fn build(buffer: &PixelBuffer, options: &QuantizeOptions) -> Self {
        let width = buffer.width();
        let height = buffer.height();
        let mut flags = vec![false; width * height];
        let mut queue: VecDeque<(usize, usize)> = VecDeque::with_capacity(2 * (width + height));

        let visit = |x: usize, y: usize, flags: &mut Vec<bool>, queue: &mut VecDeque<(usize, usize)>| {
            let idx = y * width + x;
            if flags[idx] || !is_background_like(buffer.pixel(x, y), options) {
                return;
            }
            flags[idx] = true;
            queue.push_back((x, y));
        };

        for x in 0..width {
            visit(x, 0, &mut flags, &mut queue);
            visit(x, height - 1, &mut flags, &mut queue);
        }
        for y in 0..height {
            visit(0, y, &mut flags, &mut queue);
            visit(width - 1, y, &mut flags, &mut queue);
        }

        while let Some((x, y)) = queue.pop_front() {
            if x > 0 {
                visit(x - 1, y, &mut flags, &mut queue);
            }
            if x + 1 < width {
                visit(x + 1, y, &mut flags, &mut queue);
            }
            if y > 0 {
                visit(x, y - 1, &mut flags, &mut queue);
            }
            if y + 1 < height {
                visit(x, y + 1, &mut flags, &mut queue);
            }
        }

        Self {
            width,
            height,
            flags,
        }
    }

    #[inline]
    pub fn is_background(&self, x: usize, y: usize) -> bool {
        self.flags[y * self.width + x]
    }

    /// Number of flagged pixels.
    pub fn count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// A pixel the fill may enter: near-white by color alone, or almost transparent.
#[inline]
fn is_background_like(p: Rgba, options: &QuantizeOptions) -> bool {
    if p.a < options.alpha_threshold {
        return true;
    }
    let t = options.white_threshold;
    p.r > t && p.g > t && p.b > t
}
