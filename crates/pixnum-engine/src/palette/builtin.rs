//! Built-in palettes.

use super::error::PaletteError;
use super::palette::{Palette, PaletteEntry};
use crate::color::Rgb;

/// Names accepted by [`Palette::builtin()`].
pub const BUILTIN_NAMES: [&str; 2] = ["classic", "festive"];

const CLASSIC: [PaletteEntry; 6] = [
    PaletteEntry::with_display(1, Rgb::new(128, 128, 128), Rgb::new(153, 153, 153)),
    PaletteEntry::new(2, Rgb::new(0, 0, 255)),
    PaletteEntry::with_display(3, Rgb::new(255, 165, 0), Rgb::new(255, 128, 0)),
    PaletteEntry::new(4, Rgb::new(254, 0, 0)),
    PaletteEntry::new(5, Rgb::new(255, 255, 255)),
    PaletteEntry::new(9, Rgb::new(0, 0, 0)),
];

const FESTIVE: [u32; 29] = [
    0x000000, 0x45FF2A, 0xE51D2E, 0xE87D8B, 0xE31B23, 0xF1DAF1, 0xE7B5F0, 0xE491E9, 0xEDC7F0,
    0xF2F2F2, 0xBCF1F2, 0x57B9EB, 0xE36DDE, 0xC25227, 0xBDB03D, 0x5EB838, 0xC72A1D, 0xE88C31,
    0xEFFF46, 0x53B79F, 0x313DBB, 0x8E22B9, 0xAC2BB3, 0x75147C, 0xE34135, 0x66E9F0, 0x4567EA,
    0xBD3AE5, 0xE030E3,
];

impl Palette {
    /// The six-color starter palette (indices 1-5 and 9).
    pub fn classic() -> Self {
        Self::from_builtin(CLASSIC.to_vec())
    }

    /// The 29-color palette, indices 1..=29 in order.
    pub fn festive() -> Self {
        let entries = FESTIVE
            .iter()
            .zip(1u8..)
            .map(|(&hex, index)| PaletteEntry::new(index, Rgb::from_hex_u32(hex)))
            .collect();
        Self::from_builtin(entries)
    }

    /// Look up a built-in palette by name (case-insensitive).
    ///
    /// ```
    /// use pixnum_engine::Palette;
    ///
    /// assert_eq!(Palette::builtin("Festive").unwrap().len(), 29);
    /// assert!(Palette::builtin("neon").is_err());
    /// ```
    pub fn builtin(name: &str) -> Result<Self, PaletteError> {
        match name.to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::classic()),
            "festive" => Ok(Self::festive()),
            _ => Err(PaletteError::UnknownPalette(name.to_string())),
        }
    }

    fn from_builtin(entries: Vec<PaletteEntry>) -> Self {
        match Self::new(entries) {
            Ok(palette) => palette,
            // The tables above are fixed and valid.
            Err(e) => unreachable!("built-in palette is invalid: {e}"),
        }
    }
}
