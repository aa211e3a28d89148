//! Tool configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a user `config.toml` in the config directory overrides any
//! subset of them. Command-line flags override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [split]
//! # segments = 3          # Omit for automatic (optimal count for the image)
//! vertical_align = 0.5    # 0 = top, 1 = bottom
//!
//! [peek]
//! percent = 10            # Share of each tile showing the next image (0-20)
//! blur = false            # Blur the preview strip
//!
//! [output]
//! quality = 100           # JPEG quality (1-100)
//! format = "jpg"          # jpg | png
//!
//! [processing]
//! max_processes = 4       # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [peek]
//! blur = true
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{MAX_PEEK_PERCENT, MAX_SEGMENTS, MIN_SEGMENTS, PeekSettings, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Segment splitter settings.
    pub split: SplitConfig,
    /// Peek compositor settings.
    pub peek: PeekConfig,
    /// Tile encoding settings.
    pub output: OutputConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl CarouselConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(n) = self.split.segments
            && !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&n)
        {
            return Err(ConfigError::Validation(format!(
                "split.segments must be {}-{}",
                MIN_SEGMENTS, MAX_SEGMENTS
            )));
        }
        if !(0.0..=1.0).contains(&self.split.vertical_align) {
            return Err(ConfigError::Validation(
                "split.vertical_align must be between 0 and 1".into(),
            ));
        }
        if self.peek.percent > MAX_PEEK_PERCENT {
            return Err(ConfigError::Validation(format!(
                "peek.percent must be 0-{}",
                MAX_PEEK_PERCENT
            )));
        }
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation("output.quality must be 1-100".into()));
        }
        if self.output.format.parse::<TileFormat>().is_err() {
            return Err(ConfigError::Validation(format!(
                "output.format must be jpg or png, got {:?}",
                self.output.format
            )));
        }
        Ok(())
    }
}

/// Segment splitter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Fixed segment count. When absent, each image gets its optimal count.
    pub segments: Option<u32>,
    /// Vertical window position for images taller than a segment.
    pub vertical_align: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            segments: None,
            vertical_align: 0.5,
        }
    }
}

/// Peek compositor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PeekConfig {
    pub percent: u32,
    pub blur: bool,
}

impl Default for PeekConfig {
    fn default() -> Self {
        let settings = PeekSettings::default();
        Self {
            percent: settings.percent(),
            blur: settings.blur,
        }
    }
}

impl PeekConfig {
    pub fn settings(&self) -> PeekSettings {
        PeekSettings::new(self.percent, self.blur)
    }
}

/// Tile encoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality. Ignored for PNG.
    pub quality: u32,
    /// File format of written tiles.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: Quality::default().value(),
            format: "jpg".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }

    /// Parsed format; falls back to JPEG for values `validate` would reject.
    pub fn tile_format(&self) -> TileFormat {
        self.format.parse().unwrap_or_default()
    }
}

/// Encoded tile format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TileFormat {
    #[default]
    Jpeg,
    Png,
}

impl TileFormat {
    pub fn extension(self) -> &'static str {
        match self {
            TileFormat::Jpeg => "jpg",
            TileFormat::Png => "png",
        }
    }
}

impl std::str::FromStr for TileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(TileFormat::Jpeg),
            "png" => Ok(TileFormat::Png),
            other => Err(format!("unsupported tile format: {}", other)),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel image processing workers.
    /// When absent or null, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CarouselConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read `config.toml` from `dir` as a raw value, or `None` if there is none.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto `base`, deserialize, and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CarouselConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CarouselConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for `dir`: stock defaults plus its `config.toml`.
pub fn load_config(dir: &Path) -> Result<CarouselConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Fully commented stock `config.toml`, printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# carousel-cut Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as config.toml in the directory you run carousel-cut from,
# or point at its directory with --config-dir.
# Command-line flags override anything set here.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Split: one wide image cut into square segments
# ---------------------------------------------------------------------------
[split]
# Number of segments (2-10).
# Omit to pick automatically from the image's aspect ratio.
# segments = 3

# Vertical position of the square window when the image is taller than a
# segment: 0 = top, 0.5 = center, 1 = bottom.
vertical_align = 0.5

# ---------------------------------------------------------------------------
# Peek: a sequence of images, each tile previewing the next
# ---------------------------------------------------------------------------
[peek]
# Percentage of each tile's width given to the preview strip (0-20).
percent = 10

# Blur the preview strip.
blur = false

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG encoding quality (1 = worst, 100 = best). Ignored for PNG.
quality = 100

# Tile file format: "jpg" or "png".
format = "jpg"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel image-processing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
