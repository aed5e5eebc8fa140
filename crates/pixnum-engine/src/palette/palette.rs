//! Palette struct with reference/display color storage and nearest-color matching.

use std::collections::HashSet;
use std::str::FromStr;

use super::error::PaletteError;
use crate::color::Rgb;

/// Largest number of entries a puzzle palette may carry.
pub const MAX_PALETTE_LEN: usize = 29;

/// One paintable color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Palette index shown on the grid (never 0)
    pub index: u8,
    /// Color the quantizer matches source pixels against
    pub reference: Rgb,
    /// Color the player paints with
    pub display: Rgb,
}

impl PaletteEntry {
    /// Entry whose display color equals its reference color.
    pub const fn new(index: u8, reference: Rgb) -> Self {
        Self {
            index,
            reference,
            display: reference,
        }
    }

    /// Entry with a distinct display color.
    pub const fn with_display(index: u8, reference: Rgb, display: Rgb) -> Self {
        Self {
            index,
            reference,
            display,
        }
    }
}

/// An ordered, validated set of palette entries.
///
/// Entry order is significant: it decides tie-breaking in
/// [`find_nearest()`](Palette::find_nearest) and the cycling order of the
/// color-advance selector.
///
/// # Example
///
/// ```
/// use pixnum_engine::{Palette, PaletteEntry, Rgb};
///
/// let palette = Palette::new(vec![
///     PaletteEntry::new(1, Rgb::new(0, 0, 0)),
///     PaletteEntry::new(2, Rgb::new(255, 255, 255)),
/// ])
/// .unwrap();
///
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Rgb::new(30, 30, 30)), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Create a palette from its entries, in palette order.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::EmptyPalette`] when `entries` is empty
    /// - [`PaletteError::TooManyEntries`] above [`MAX_PALETTE_LEN`]
    /// - [`PaletteError::ReservedIndex`] when an entry uses index 0
    /// - [`PaletteError::DuplicateIndex`] when two entries share an index
    pub fn new(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if entries.len() > MAX_PALETTE_LEN {
            return Err(PaletteError::TooManyEntries {
                len: entries.len(),
                max: MAX_PALETTE_LEN,
            });
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            if entry.index == 0 {
                return Err(PaletteError::ReservedIndex);
            }
            if !seen.insert(entry.index) {
                return Err(PaletteError::DuplicateIndex { index: entry.index });
            }
        }

        Ok(Self { entries })
    }

    /// Create a palette from `(index, reference_hex, display_hex)` triples.
    ///
    /// A missing display color falls back to the reference color.
    ///
    /// ```
    /// use pixnum_engine::{Palette, Rgb};
    ///
    /// let palette = Palette::from_hex(&[(1, "#000", None), (2, "#FFF", Some("#F2F2F2"))]).unwrap();
    /// assert_eq!(palette.display(2), Some(Rgb::new(0xF2, 0xF2, 0xF2)));
    /// ```
    pub fn from_hex(entries: &[(u8, &str, Option<&str>)]) -> Result<Self, PaletteError> {
        let entries = entries
            .iter()
            .map(|&(index, reference, display)| {
                let reference = Rgb::from_str(reference)?;
                let display = match display {
                    Some(d) => Rgb::from_str(d)?,
                    None => reference,
                };
                Ok(PaletteEntry::with_display(index, reference, display))
            })
            .collect::<Result<Vec<_>, PaletteError>>()?;
        Self::new(entries)
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in palette order.
    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// Indices in palette order.
    pub fn indices(&self) -> Vec<u8> {
        self.entries.iter().map(|e| e.index).collect()
    }

    pub fn contains(&self, index: u8) -> bool {
        self.entry(index).is_some()
    }

    pub fn entry(&self, index: u8) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.index == index)
    }

    /// Reference color for `index`.
    pub fn reference(&self, index: u8) -> Option<Rgb> {
        self.entry(index).map(|e| e.reference)
    }

    /// Display color for `index`.
    pub fn display(&self, index: u8) -> Option<Rgb> {
        self.entry(index).map(|e| e.display)
    }

    /// Find the palette index whose reference color is closest to `color`.
    ///
    /// Uses squared Euclidean distance in RGB space. The comparison is a
    /// strict `<`, so among equally distant entries the first one in palette
    /// order wins.
    #[inline]
    pub fn find_nearest(&self, color: Rgb) -> u8 {
        // Linear scan - palettes never exceed MAX_PALETTE_LEN entries
        let mut best = self.entries[0].index;
        let mut best_dist = u32::MAX;
        for entry in &self.entries {
            let dist = color.distance_squared(entry.reference);
            if dist < best_dist {
                best_dist = dist;
                best = entry.index;
            }
        }
        best
    }
}
