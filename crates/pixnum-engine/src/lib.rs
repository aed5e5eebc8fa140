//! pixnum-engine: paint-by-numbers conversion and paint-state
//!
//! This library turns a decoded raster image into a paint-by-numbers puzzle
//! and tracks the player's progress on it.
//!
//! # Quick Start
//!
//! ```
//! use pixnum_engine::{PaintState, Palette, PixelBuffer, Quantizer, Rgba};
//!
//! let white = Rgba::new(255, 255, 255, 255);
//! let blue = Rgba::new(0, 0, 250, 255);
//! let pixels = [white, blue, blue, white];
//! let buffer = PixelBuffer::from_pixels(4, 1, &pixels).unwrap();
//!
//! let palette = Palette::classic();
//! let target = Quantizer::new(palette.clone()).convert(&buffer).unwrap();
//! assert_eq!(target.cells(), &[0, 2, 2, 0]);
//!
//! let mut state = PaintState::from_target(target);
//! assert!(state.paint_if_matches(1, 0, 2));
//! assert!(!state.paint_if_matches(2, 0, 9)); // wrong color
//! assert_eq!(state.overall_progress().painted, 1);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! PixelBuffer (RGBA)
//!     |
//!     v
//! BackgroundMask     (flood fill from the border through near-white
//!     |               or transparent pixels)
//!     v
//! Quantizer          (nearest palette reference color, squared RGB distance)
//!     |
//!     v
//! TargetGrid  ---->  PaintState  <---->  ProgressCodec  <---->  KeyValueStore
//!                    (paint rules,        (painted_v1_<id>,
//!                     progress counts)     selected_v1_<id>)
//! ```
//!
//! # Paint Rules
//!
//! A cell can only ever be painted with its own target color. Painting out
//! of bounds, on a background cell, or with the wrong color is a no-op that
//! returns `false`; these are normal gameplay outcomes, not errors.

pub mod color;
pub mod error;
pub mod grid;
pub mod palette;
pub mod progress;
pub mod quantize;


pub use color::{Rgb, Rgba};
pub use error::EngineError;
pub use grid::{
    next_incomplete, ColorProgress, PaintState, ProgressSnapshot, ShapeMismatch, TargetGrid,
    EMPTY_CELL,
};
pub use palette::{
    Palette, PaletteEntry, PaletteError, ParseColorError, BUILTIN_NAMES, MAX_PALETTE_LEN,
};
pub use progress::{
    CodecError, KeyValueStore, MemoryStore, ProgressCodec, SavedProgress, StoreError,
};
pub use quantize::{BackgroundMask, ConversionError, PixelBuffer, QuantizeOptions, Quantizer};
