//! Record of a finished carousel, written as `manifest.json` next to the tiles.
//!
//! The manifest lists the sources in sequence order, the settings that
//! produced the tiles, and every tile file in posting order.

use crate::imaging::FocalPoint;
use serde::{Deserialize, Serialize};

/// File name of the manifest inside the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselManifest {
    pub settings: CarouselSettings,
    /// Side of every (square) tile in pixels.
    pub tile_size: u32,
    /// Tile file extension (`jpg` or `png`).
    pub format: String,
    /// JPEG quality used for encoding.
    pub quality: u32,
    pub sources: Vec<SourceRecord>,
    pub tiles: Vec<TileRecord>,
}

/// Mode-specific settings the tiles were rendered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum CarouselSettings {
    Split {
        segments: u32,
        vertical_align: f64,
    },
    Peek {
        percent: u32,
        blur: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// Cover-fit focal point, written as `"x,y"`. Peek mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focal: Option<FocalPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileRecord {
    /// 1-based posting position.
    pub position: usize,
    /// File name relative to the output directory.
    pub file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serialize_with_mode_tag() {
        let json = serde_json::to_value(CarouselSettings::Peek {
            percent: 10,
            blur: true,
        })
        .unwrap();
        assert_eq!(json["mode"], "peek");
        assert_eq!(json["percent"], 10);
        assert_eq!(json["blur"], true);
    }

    #[test]
    fn source_without_focal_omits_field() {
        let json = serde_json::to_string(&SourceRecord {
            path: "pano.jpg".into(),
            width: 3000,
            height: 1000,
            focal: None,
        })
        .unwrap();
        assert!(!json.contains("focal"));
    }

    #[test]
    fn source_focal_is_clamped_on_read() {
        let source: SourceRecord = serde_json::from_str(
            r#"{"path": "a.jpg", "width": 10, "height": 10, "focal": "1.5,-0.2"}"#,
        )
        .unwrap();
        assert_eq!(source.focal, Some(FocalPoint::new(1.0, 0.0)));
    }

    #[test]
    fn manifest_parses_back() {
        let manifest = CarouselManifest {
            settings: CarouselSettings::Split {
                segments: 3,
                vertical_align: 0.5,
            },
            tile_size: 1000,
            format: "jpg".into(),
            quality: 100,
            sources: vec![],
            tiles: vec![TileRecord {
                position: 1,
                file: "pano-1.jpg".into(),
            }],
        };
        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let parsed: CarouselManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, manifest);
    }
}
