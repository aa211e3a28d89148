//! Pure Rust codec backend: statically linked, no system libraries.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `ImageReader::into_decoder` (header only, EXIF-oriented) |
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format sniffing |
//! | Orient | `ImageDecoder::orientation` + `DynamicImage::apply_orientation` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality from [`Quality`](super::Quality)) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, quality ignored) |
//!
//! JPEG has no alpha channel. Tiles are flattened to RGB before encoding, so
//! any transparent area (e.g. the unused tail of an overrunning segment)
//! comes out black.
//!
//! Sources are oriented on the way in: a phone shot stored landscape with an
//! EXIF Rotate90 tag is identified and decoded as portrait.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::cover::Tile;
use super::params::SaveParams;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageEncoder, ImageFormat, ImageReader};
use std::io::BufWriter;
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension we can decode (case-insensitive).
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_jpeg(tile: &Tile, path: &Path, quality: u8) -> Result<(), BackendError> {
    let file = std::fs::File::create(path)?;
    let rgb = DynamicImage::ImageRgba8(tile.clone()).to_rgb8();
    JpegEncoder::new_with_quality(BufWriter::new(file), quality)
        .write_image(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))
}

fn encode_png(tile: &Tile, path: &Path) -> Result<(), BackendError> {
    let file = std::fs::File::create(path)?;
    PngEncoder::new(BufWriter::new(file))
        .write_image(
            tile.as_raw(),
            tile.width(),
            tile.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| BackendError::ProcessingFailed(format!("PNG encode failed: {}", e)))
}

/// Open a decoder for `path`, sniffing the format from content.
fn open_decoder(path: &Path) -> Result<impl ImageDecoder, BackendError> {
    ImageReader::open(path)?
        .with_guessed_format()?
        .into_decoder()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read {}: {}", path.display(), e))
        })
}

/// EXIF orientation of the decoder's image; unreadable metadata counts as upright.
fn read_orientation(decoder: &mut impl ImageDecoder) -> Orientation {
    decoder.orientation().unwrap_or(Orientation::NoTransforms)
}

/// Whether displaying with `orientation` exchanges width and height.
fn swaps_axes(orientation: Orientation) -> bool {
    matches!(
        orientation,
        Orientation::Rotate90
            | Orientation::Rotate270
            | Orientation::Rotate90FlipH
            | Orientation::Rotate270FlipH
    )
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let mut decoder = open_decoder(path)?;
        let (mut width, mut height) = decoder.dimensions();
        if swaps_axes(read_orientation(&mut decoder)) {
            std::mem::swap(&mut width, &mut height);
        }
        Ok(Dimensions { width, height })
    }

    fn load(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        let mut decoder = open_decoder(path)?;
        let orientation = read_orientation(&mut decoder);
        let mut image = DynamicImage::from_decoder(decoder).map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })?;
        image.apply_orientation(orientation);
        Ok(image)
    }

    fn save(&self, tile: &Tile, params: &SaveParams) -> Result<(), BackendError> {
        let ext = params
            .output
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "jpg" | "jpeg" => encode_jpeg(tile, &params.output, params.quality.value() as u8),
            "png" => encode_png(tile, &params.output),
            other => Err(BackendError::UnsupportedFormat(other.to_string())),
        }
    }
}
