//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. Every numeric
//! knob is clamped into its documented range on construction, so the render
//! functions downstream can assume pre-validated input.
//!
//! ## Types
//!
//! - [`Quality`]: lossy encoding quality (1–100, default 100). Clamped on construction.
//! - [`FocalPoint`]: normalized crop anchor in `[0, 1]²`, default centered.
//! - [`PeekSettings`]: peek strip width percentage (0–20) and blur flag.
//! - [`SaveParams`]: output path and quality for encoding a finished tile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Widest allowed peek strip, as a percentage of the tile side.
pub const MAX_PEEK_PERCENT: u32 = 20;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    /// Exports are full quality; previews pick their own lower value.
    fn default() -> Self {
        Self(100)
    }
}

/// Fractional anchor within the croppable excess of an image.
///
/// `(0, 0)` keeps the top-left of the excess, `(1, 1)` the bottom-right.
/// Only the axis that actually has excess matters for a given crop.
///
/// Serializes as the same `"x,y"` text the CLI accepts, and deserializing
/// goes through [`FromStr`], so out-of-range values are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    pub const CENTER: FocalPoint = FocalPoint { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: clamp_unit(x),
            y: clamp_unit(y),
        }
    }
}

impl Default for FocalPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

impl fmt::Display for FocalPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl FromStr for FocalPoint {
    type Err = String;

    /// Parse `"x,y"`, e.g. `"0.5,0.25"`. Values are clamped to `[0, 1]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'x,y', got '{s}'"))?;
        let x: f64 = x
            .trim()
            .parse()
            .map_err(|_| format!("invalid focal x '{}'", x.trim()))?;
        let y: f64 = y
            .trim()
            .parse()
            .map_err(|_| format!("invalid focal y '{}'", y.trim()))?;
        Ok(Self::new(x, y))
    }
}

impl From<FocalPoint> for String {
    fn from(point: FocalPoint) -> Self {
        point.to_string()
    }
}

impl TryFrom<String> for FocalPoint {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Clamp to `[0, 1]`, mapping NaN to the center.
pub(crate) fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Peek strip configuration.
///
/// `percent = 0` still produces full-size square tiles, just with no
/// visible preview of the next image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekSettings {
    percent: u32,
    pub blur: bool,
}

impl PeekSettings {
    pub fn new(percent: u32, blur: bool) -> Self {
        Self {
            percent: percent.min(MAX_PEEK_PERCENT),
            blur,
        }
    }

    pub fn percent(self) -> u32 {
        self.percent
    }
}

impl Default for PeekSettings {
    fn default() -> Self {
        Self::new(10, false)
    }
}

/// Parameters for encoding one finished tile to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveParams {
    pub output: PathBuf,
    pub quality: Quality,
}
