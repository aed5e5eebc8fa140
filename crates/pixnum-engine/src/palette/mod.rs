//! Palette types
//!
//! A palette is the ordered set of paintable colors of a puzzle. Each entry
//! carries a reference color (used for quantization) and a display color
//! (what the player paints with).

mod builtin;
mod error;
mod palette;

pub use builtin::BUILTIN_NAMES;
pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, PaletteEntry, MAX_PALETTE_LEN};
