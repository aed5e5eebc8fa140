//! Image-to-grid conversion.
//!
//! [`Quantizer::convert()`] turns a decoded [`PixelBuffer`] into a
//! [`TargetGrid`](crate::grid::TargetGrid): background segmentation first,
//! then nearest-color matching of everything that remains.

mod background;
mod error;
mod options;
mod pixels;
mod quantizer;

pub use background::BackgroundMask;
pub use error::ConversionError;
pub use options::QuantizeOptions;
pub use pixels::PixelBuffer;
pub use quantizer::Quantizer;
