pub mod config;

pub use config::{AppConfig, PaletteConfig, PaletteEntryConfig, PuzzleConfig};
