//! Peek compositing: a sequence of square tiles where each tile's right edge
//! previews the start of the next image.
//!
//! ## Two passes
//!
//! 1. **Wide pre-render** (independent per image, run in parallel): every image
//!    is cover-fitted into a `(size + peek) × size` buffer around its focal point.
//! 2. **Assembly** (tile `i` needs wide renders `i` and `i + 1`):
//!
//! ```text
//!              wide[i]                         wide[i+1]
//!   ┌────────┬──────────────────┬─────┐   ┌─────┬──────────────────┬─────┐
//!   │ offset │     main         │     │   │peek │  main of tile i+1 │     │
//!   └────────┴──────────────────┴─────┘   └─────┴──────────────────┴─────┘
//!             ╲                 ╱            │
//!   tile i:   ┌──────────────────┬─────┐     │
//!             │      main        │peek │ ◄───┘
//!             └──────────────────┴─────┘
//! ```
//!
//! Tile `i + 1` starts at column `peek` of its wide render, right where the
//! strip shown on tile `i` ended, so nothing is duplicated or skipped across
//! the seam. The last tile has nothing to preview and shows a full square
//! from its wide render.
//!
//! ## Blur
//!
//! With blur on, the strip source is widened by [`BLUR_MARGIN`] columns and
//! drawn that many columns early, so the Gaussian has real pixels to sample
//! at the seam instead of a hard edge. A [`SEAM_WIDTH`]-column sliver of the
//! main image is then redrawn over the seam to cut off any blur that bled
//! past it.

use super::calculations::{PeekLayout, calculate_peek_layout};
use super::cover::{SourceImage, Tile, render_cover_fit};
use super::params::{FocalPoint, PeekSettings};
use image::GenericImageView;
use image::imageops;
use rayon::prelude::*;

/// Standard deviation of the peek-strip blur, in pixels.
pub const BLUR_SIGMA: f32 = 8.0;
/// Extra columns sampled before the peek strip when blurring.
pub const BLUR_MARGIN: u32 = 4;
/// Unblurred main-image columns redrawn at the seam after blurring.
pub const SEAM_WIDTH: u32 = 2;

/// Compose `images` into a peek carousel.
///
/// Returns one `size × size` tile per image, where `size` is the largest
/// width or height among the inputs. `focal_points[i]` frames image `i`;
/// missing entries default to the center.
///
/// Peek compositing needs a successor to preview, so fewer than two images
/// yield an empty `Vec`. That is a "nothing to do" result, not an error.
#[tracing::instrument(skip(images, focal_points), fields(count = images.len()))]
pub fn compose_peek_sequence<I: SourceImage + Sync>(
    images: &[I],
    settings: PeekSettings,
    focal_points: &[FocalPoint],
) -> Vec<Tile> {
    if images.len() < 2 {
        return Vec::new();
    }
    let dimensions: Vec<(u32, u32)> = images.iter().map(|img| img.dimensions()).collect();
    let Some(layout) = calculate_peek_layout(&dimensions, settings.percent()) else {
        return Vec::new();
    };
    tracing::debug!(
        size = layout.size,
        peek_width = layout.peek_width,
        main_width = layout.main_width,
        "peek layout"
    );

    let wides = render_wide(images, &layout, focal_points);
    (0..wides.len())
        .map(|index| assemble_tile(index, &wides, &layout, settings.blur))
        .collect()
}

/// Pass 1: cover-fit every image into a wide buffer, in parallel.
///
/// Public so callers can preview the intermediate buffers; tile `i` of
/// [`compose_peek_sequence`] is built purely from `wide[i]` and `wide[i + 1]`.
pub fn render_wide<I: SourceImage + Sync>(
    images: &[I],
    layout: &PeekLayout,
    focal_points: &[FocalPoint],
) -> Vec<Tile> {
    images
        .par_iter()
        .enumerate()
        .map(|(i, img)| {
            let focal = focal_points.get(i).copied().unwrap_or_default();
            render_cover_fit(img, layout.wide_width(), layout.size, focal)
        })
        .collect()
}

/// Pass 2: build tile `index` from its own wide render and its successor's.
fn assemble_tile(index: usize, wides: &[Tile], layout: &PeekLayout, blur: bool) -> Tile {
    let PeekLayout {
        size,
        peek_width,
        main_width,
    } = *layout;
    let offset = layout.content_offset(index);
    let wide = &wides[index];
    let mut tile = Tile::new(size, size);

    let Some(next) = wides.get(index + 1) else {
        draw_columns(&mut tile, wide, offset, size, 0);
        return tile;
    };

    draw_columns(&mut tile, wide, offset, main_width, 0);
    if peek_width == 0 {
        return tile;
    }

    if blur {
        draw_blurred_peek(&mut tile, next, layout);
        // Seam cleanup: mandatory after blurring
        let seam = SEAM_WIDTH.min(main_width);
        draw_columns(
            &mut tile,
            wide,
            offset + main_width - seam,
            seam,
            main_width - seam,
        );
    } else {
        draw_columns(&mut tile, next, 0, peek_width, main_width);
    }
    tile
}

/// Blur the first `peek + margin` columns of `next` and draw them ending at
/// the tile's right edge.
fn draw_blurred_peek(tile: &mut Tile, next: &Tile, layout: &PeekLayout) {
    let width = (layout.peek_width + BLUR_MARGIN).min(next.width());
    let strip = next.view(0, 0, width, next.height()).to_image();
    let blurred = imageops::blur(&strip, BLUR_SIGMA);
    let dst_x = layout.main_width.saturating_sub(BLUR_MARGIN);
    imageops::replace(tile, &blurred, i64::from(dst_x), 0);
}

/// Copy `width` columns of `src` starting at `src_x` into `dst` at `dst_x`.
///
/// Clipped to both buffers; rows beyond the shorter height are left alone.
fn draw_columns(dst: &mut Tile, src: &Tile, src_x: u32, width: u32, dst_x: u32) {
    let width = width
        .min(src.width().saturating_sub(src_x))
        .min(dst.width().saturating_sub(dst_x));
    let height = src.height().min(dst.height());
    if width == 0 || height == 0 {
        return;
    }
    let strip = src.view(src_x, 0, width, height).to_image();
    imageops::replace(dst, &strip, i64::from(dst_x), 0);
}
