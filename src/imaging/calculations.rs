//! Pure calculation functions for carousel geometry.
//!
//! All functions here are pure and testable without any I/O or pixels. The
//! renderers in [`cover`](super::cover), [`split`](super::split) and
//! [`peek`](super::peek) only ever sample the rectangles computed here.
//!
//! Rounding follows one rule throughout: a length is rounded once and then
//! reused. For segments this means `side = round(width / count)` and every
//! boundary is `i * side`, so the segments of a width that doesn't divide
//! evenly may end a few pixels short of (or past) the right edge. That slack
//! is kept as-is; consumers depend on the exact offsets.

use super::params::{FocalPoint, clamp_unit};

/// Fewest slides a split may produce.
pub const MIN_SEGMENTS: u32 = 2;
/// Most slides a split may produce.
pub const MAX_SEGMENTS: u32 = 10;

/// Suggest a segment count for a wide image: its aspect ratio, rounded.
///
/// Only a default for the caller; nothing enforces it.
///
/// # Examples
/// ```
/// # use carousel_cut::imaging::optimal_segment_count;
/// assert_eq!(optimal_segment_count(1600, 800), 2);
/// // 11.25 rounds to 11, clamped to the 10-slide maximum
/// assert_eq!(optimal_segment_count(9000, 800), 10);
/// ```
pub fn optimal_segment_count(width: u32, height: u32) -> u32 {
    let ratio = width as f64 / height as f64;
    (ratio.round() as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Side length of every square segment: `round(width / count)`.
pub fn segment_side(image_width: u32, segment_count: u32) -> u32 {
    (image_width as f64 / segment_count as f64).round() as u32
}

/// Left edge of each segment, in order.
///
/// # Examples
/// ```
/// # use carousel_cut::imaging::segment_boundaries;
/// assert_eq!(segment_boundaries(3000, 3), vec![0, 1000, 2000]);
/// // side rounds to 333; the last segment ends at 999, one short of the edge
/// assert_eq!(segment_boundaries(1000, 3), vec![0, 333, 666]);
/// ```
pub fn segment_boundaries(image_width: u32, segment_count: u32) -> Vec<u32> {
    let side = segment_side(image_width, segment_count);
    (0..segment_count).map(|i| i * side).collect()
}

/// Source windows for a uniform horizontal split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentCrop {
    /// Output tile side and source window width.
    pub side: u32,
    /// Top of the source window, shared by every segment.
    pub source_y: u32,
    /// Rows sampled from the source: `min(side, image height)`.
    pub source_height: u32,
    /// Left edge of each window (see [`segment_boundaries`]).
    pub offsets: Vec<u32>,
}

/// Compute the crop windows for splitting `source` into `segment_count` squares.
///
/// `vertical_align` picks where the window sits inside the spare height:
/// 0 = top, 0.5 = centered, 1 = bottom. When the image is no taller than a
/// segment there is no spare height and alignment has no effect.
pub fn calculate_segment_crop(
    source: (u32, u32),
    segment_count: u32,
    vertical_align: f64,
) -> SegmentCrop {
    let (width, height) = source;
    let side = segment_side(width, segment_count);
    let max_offset = height.saturating_sub(side);

    SegmentCrop {
        side,
        source_y: (max_offset as f64 * clamp_unit(vertical_align)).round() as u32,
        source_height: side.min(height),
        offsets: segment_boundaries(width, segment_count),
    }
}

/// Crop window position relative to the full image, for drawing a preview overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOverlay {
    pub side: u32,
    /// Window height as a fraction of image height. Above 1 when the image is
    /// shorter than a segment.
    pub crop_height_fraction: f64,
    /// Window top as a fraction of image height.
    pub crop_top_fraction: f64,
    /// Whether there is spare height for the alignment to move the window.
    pub adjustable: bool,
}

pub fn calculate_segment_overlay(
    source: (u32, u32),
    segment_count: u32,
    vertical_align: f64,
) -> SegmentOverlay {
    let (width, height) = source;
    let side = segment_side(width, segment_count);
    let max_offset = height as f64 - side as f64;
    let h = height as f64;

    SegmentOverlay {
        side,
        crop_height_fraction: side as f64 / h,
        crop_top_fraction: if max_offset > 0.0 {
            clamp_unit(vertical_align) * max_offset / h
        } else {
            0.0
        },
        adjustable: side < height,
    }
}

/// Fractional source rectangle in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer source rectangle, guaranteed to lie inside the image it was snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Snap to whole pixels inside `bounds` (image width, height).
    ///
    /// Lengths round to the nearest pixel (at least 1, at most the bound);
    /// origins round and are then pulled back so the rect never overruns.
    pub fn to_pixels(&self, bounds: (u32, u32)) -> PixelRect {
        let width = snap_length(self.width, bounds.0);
        let height = snap_length(self.height, bounds.1);
        PixelRect {
            x: snap_origin(self.x, bounds.0.saturating_sub(width)),
            y: snap_origin(self.y, bounds.1.saturating_sub(height)),
            width,
            height,
        }
    }
}

fn snap_length(length: f64, bound: u32) -> u32 {
    (length.round().max(0.0) as u32).min(bound).max(1)
}

fn snap_origin(origin: f64, max: u32) -> u32 {
    (origin.round().max(0.0) as u32).min(max)
}

/// Source rectangle that cover-fits `source` into `target` around `focal`.
///
/// The side with relative excess is cropped; the other spans the full image.
/// The focal point positions the window within the excess, so offsets are
/// always in `[0, excess]`. When the aspect ratios match there is no excess
/// on either axis and the focal point has no effect.
pub fn calculate_cover_crop(source: (u32, u32), target: (u32, u32), focal: FocalPoint) -> CropRect {
    let (src_w, src_h) = (source.0 as f64, source.1 as f64);
    let target_ratio = target.0 as f64 / target.1 as f64;

    if src_w / src_h > target_ratio {
        // Source is wider: keep full height, crop sides
        let width = src_h * target_ratio;
        CropRect {
            x: (src_w - width) * clamp_unit(focal.x),
            y: 0.0,
            width,
            height: src_h,
        }
    } else {
        // Source is taller (or equal): keep full width, crop top/bottom
        let height = src_w / target_ratio;
        CropRect {
            x: 0.0,
            y: (src_h - height) * clamp_unit(focal.y),
            width: src_w,
            height,
        }
    }
}

/// Shared geometry for one peek sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekLayout {
    /// Side of every output tile.
    pub size: u32,
    /// Width of the strip previewing the next image.
    pub peek_width: u32,
    /// Width left for the tile's own image: `size - peek_width`.
    pub main_width: u32,
}

impl PeekLayout {
    /// Width of each wide pre-render: one tile plus one peek strip.
    pub fn wide_width(&self) -> u32 {
        self.size + self.peek_width
    }

    /// First wide-render column shown by tile `index`.
    ///
    /// Every tile after the first skips the columns the previous tile
    /// already showed as its peek strip.
    pub fn content_offset(&self, index: usize) -> u32 {
        if index == 0 { 0 } else { self.peek_width }
    }
}

/// Tile size and strip widths for a peek sequence over `sources`.
///
/// The tile side is the largest dimension of any source, so no image is
/// downscaled. Returns `None` for an empty slice.
pub fn calculate_peek_layout(sources: &[(u32, u32)], peek_percent: u32) -> Option<PeekLayout> {
    let size = sources.iter().map(|&(w, h)| w.max(h)).max()?;
    let peek_width = (size as f64 * (peek_percent as f64 / 100.0)).round() as u32;
    let peek_width = peek_width.min(size);
    Some(PeekLayout {
        size,
        peek_width,
        main_width: size - peek_width,
    })
}
