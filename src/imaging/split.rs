//! Uniform horizontal split of one wide image into square segments.
//!
//! Each segment is a direct crop: the window is exactly one segment side
//! wide, so columns map 1:1. The only resampling happens when the image is
//! shorter than a segment side; then the available rows are stretched to
//! fill the square.
//!
//! Windows that run past the right edge (see the rounding note in
//! [`calculations`](super::calculations)) draw only their in-bounds columns.
//! The rest of that tile stays transparent.

use super::calculations::{MAX_SEGMENTS, MIN_SEGMENTS, SegmentCrop, calculate_segment_crop};
use super::cover::{SourceImage, Tile};
use image::GenericImageView;
use image::imageops::{self, FilterType};

/// Split `image` into `segment_count` equal squares of side `round(width / count)`.
///
/// `segment_count` is clamped to `[2, 10]`; `vertical_align` to `[0, 1]`.
/// Every returned tile has the same dimensions.
#[tracing::instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn split_into_segments<I: SourceImage>(
    image: &I,
    segment_count: u32,
    vertical_align: f64,
) -> Vec<Tile> {
    let count = segment_count.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
    let crop = calculate_segment_crop(image.dimensions(), count, vertical_align);
    tracing::debug!(
        side = crop.side,
        source_y = crop.source_y,
        source_height = crop.source_height,
        "segment crop"
    );

    crop.offsets
        .iter()
        .map(|&source_x| render_segment(image, &crop, source_x))
        .collect()
}

fn render_segment<I: SourceImage>(image: &I, crop: &SegmentCrop, source_x: u32) -> Tile {
    let side = crop.side;
    let mut tile = Tile::new(side, side);

    let visible = side.min(image.width().saturating_sub(source_x));
    if visible == 0 || crop.source_height == 0 {
        return tile;
    }

    let region = image
        .view(source_x, crop.source_y, visible, crop.source_height)
        .to_image();
    let region = if crop.source_height == side {
        region
    } else {
        imageops::resize(&region, visible, side, FilterType::Lanczos3)
    };
    imageops::replace(&mut tile, &region, 0, 0);
    tile
}
