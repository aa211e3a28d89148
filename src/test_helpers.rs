//! Shared test utilities for the carousel-cut test suite.
//!
//! Synthetic images with predictable pixels, so tests can assert exactly
//! which source column or row ended up where, plus writers for on-disk
//! fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = horizontal_gradient(300, 100);
//! let tiles = split_into_segments(&img, 3, 0.5);
//! assert_eq!(column(&tiles[1], 0), column(&img, 100));
//! ```

use image::{ImageEncoder, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Every pixel the same color.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Each column gets a distinct color (unique for widths up to 65536), and
/// rows vary in the blue channel.
pub fn horizontal_gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let [lo, hi] = (x as u16).to_le_bytes();
        Rgba([lo, hi, (y % 256) as u8, 255])
    })
}

/// Top half red, bottom half blue.
pub fn top_bottom(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        if y < height / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

/// All pixels of column `x`, top to bottom.
pub fn column(img: &RgbaImage, x: u32) -> Vec<Rgba<u8>> {
    (0..img.height()).map(|y| *img.get_pixel(x, y)).collect()
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write a gradient JPEG with the given dimensions.
pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a gradient JPEG whose EXIF block carries `orientation` (1-8).
///
/// Pixels are stored `width` x `height`; viewers that honor the tag show
/// the rotated or flipped image.
pub fn write_test_jpeg_with_orientation(path: &Path, width: u32, height: u32, orientation: u16) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    // Big-endian TIFF header, one IFD with a single SHORT entry (tag 0x0112).
    let mut exif = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08, 0x00, 0x01];
    exif.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    exif.extend_from_slice(&orientation.to_be_bytes());
    exif.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);

    let file = std::fs::File::create(path).unwrap();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file));
    encoder.set_exif_metadata(exif).unwrap();
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
