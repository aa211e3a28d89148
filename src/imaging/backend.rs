//! Image decode/encode backend trait and shared types.
//!
//! The renderers never touch files. Everything that crosses the filesystem
//! boundary goes through [`ImageBackend`]: identify, load (decode), and save
//! (encode a finished tile).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate's pure-Rust codecs.

use super::cover::Tile;
use super::params::SaveParams;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<Dimensions> for (u32, u32) {
    fn from(d: Dimensions) -> Self {
        (d.width, d.height)
    }
}

/// Trait for image codec backends.
///
/// `Sync` so one backend can serve rayon workers encoding tiles in parallel.
pub trait ImageBackend: Sync {
    /// Get image dimensions without a full decode where the format allows.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode an image from disk.
    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError>;

    /// Encode a finished tile to `params.output`; format follows the extension.
    fn save(&self, tile: &Tile, params: &SaveParams) -> Result<(), BackendError>;
}
