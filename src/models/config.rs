use crate::assets::AssetLoader;
use pixnum_engine::{Palette, PaletteError, QuantizeOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Palette used to quantize every puzzle
    #[serde(default)]
    pub palette: PaletteConfig,

    /// Quiet interval before progress is written, in milliseconds
    #[serde(default = "default_save_debounce_ms")]
    pub save_debounce_ms: u64,

    /// Select the next unfinished color when the selected one is complete
    #[serde(default = "default_auto_advance")]
    pub auto_advance: bool,

    /// Channels above this value count as near-white background
    #[serde(default = "default_white_threshold")]
    pub white_threshold: u8,

    /// Alpha below this value counts as transparent
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,

    /// Puzzle catalog, keyed by image identity
    #[serde(default)]
    pub puzzles: BTreeMap<String, PuzzleConfig>,
}

fn default_save_debounce_ms() -> u64 {
    500
}

fn default_auto_advance() -> bool {
    true
}

fn default_white_threshold() -> u8 {
    245
}

fn default_alpha_threshold() -> u8 {
    10
}

/// Either a built-in palette name or an explicit list of entries
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum PaletteConfig {
    Named(String),
    Custom(Vec<PaletteEntryConfig>),
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig::Named("classic".to_string())
    }
}

/// One entry of a custom palette
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaletteEntryConfig {
    pub index: u8,
    /// Reference color used for matching
    pub color: String,
    /// Color shown to the player, defaults to `color`
    #[serde(default)]
    pub display: Option<String>,
}

/// Configuration for a puzzle
#[derive(Debug, Deserialize, Clone)]
pub struct PuzzleConfig {
    /// Human-readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Path to the PNG image (relative to puzzles/ directory)
    pub image: PathBuf,
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        puzzles = config.puzzles.len(),
                        auto_advance = config.auto_advance,
                        save_debounce_ms = config.save_debounce_ms,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Build the configured palette.
    pub fn build_palette(&self) -> Result<Palette, PaletteError> {
        match &self.palette {
            PaletteConfig::Named(name) => Palette::builtin(name),
            PaletteConfig::Custom(entries) => {
                let triples: Vec<(u8, &str, Option<&str>)> = entries
                    .iter()
                    .map(|e| (e.index, e.color.as_str(), e.display.as_deref()))
                    .collect();
                Palette::from_hex(&triples)
            }
        }
    }

    /// The configured palette, or the classic palette if it is invalid.
    pub fn palette_or_default(&self) -> Palette {
        self.build_palette().unwrap_or_else(|e| {
            tracing::warn!(%e, "Invalid palette in config, using classic");
            Palette::classic()
        })
    }

    pub fn quantize_options(&self) -> QuantizeOptions {
        QuantizeOptions::new()
            .white_threshold(self.white_threshold)
            .alpha_threshold(self.alpha_threshold)
    }

    pub fn save_debounce(&self) -> Duration {
        Duration::from_millis(self.save_debounce_ms)
    }

    /// Get puzzle config by id
    pub fn get_puzzle(&self, id: &str) -> Option<&PuzzleConfig> {
        self.puzzles.get(id)
    }

    /// Every configured puzzle id, sorted
    pub fn puzzle_ids(&self) -> impl Iterator<Item = &str> {
        self.puzzles.keys().map(String::as_str)
    }
}

impl PuzzleConfig {
    /// Title, or the puzzle id when none is configured
    pub fn title_or<'a>(&'a self, id: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(id)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut puzzles = BTreeMap::new();
        puzzles.insert(
            "heart".to_string(),
            PuzzleConfig {
                title: Some("Heart".to_string()),
                image: PathBuf::from("heart.png"),
            },
        );

        Self {
            palette: PaletteConfig::default(),
            save_debounce_ms: default_save_debounce_ms(),
            auto_advance: default_auto_advance(),
            white_threshold: default_white_threshold(),
            alpha_threshold: default_alpha_threshold(),
            puzzles,
        }
    }
}
