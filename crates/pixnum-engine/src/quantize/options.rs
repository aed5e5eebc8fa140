//! Quantizer thresholds.

/// Thresholds used by background segmentation and quantization.
///
/// Defaults: a pixel is near-white when all channels exceed 245, and
/// transparent when alpha is below 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizeOptions {
    /// Channels strictly above this value count as white.
    pub white_threshold: u8,
    /// Alpha strictly below this value counts as transparent.
    pub alpha_threshold: u8,
}

impl QuantizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn white_threshold(mut self, value: u8) -> Self {
        self.white_threshold = value;
        self
    }

    #[inline]
    pub fn alpha_threshold(mut self, value: u8) -> Self {
        self.alpha_threshold = value;
        self
    }
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            white_threshold: 245,
            alpha_threshold: 10,
        }
    }
}
