//! Cover-fit rendering: crop + scale one image so it fills a target rectangle.
//!
//! The crop window comes from [`calculate_cover_crop`], snapped to whole
//! pixels, then resampled with Lanczos3 (the same filter used for every
//! resize in this crate). No letterboxing: the target is always filled.

use super::calculations::calculate_cover_crop;
use super::params::FocalPoint;
use image::imageops::{self, FilterType};
use image::{GenericImageView, Rgba, RgbaImage};

/// Decoded pixels the renderers can read from.
///
/// Implemented for anything that views as 8-bit RGBA, which includes both
/// [`image::DynamicImage`] and [`RgbaImage`]. Sources are only ever read.
pub trait SourceImage: GenericImageView<Pixel = Rgba<u8>> + 'static {}

impl<T> SourceImage for T where T: GenericImageView<Pixel = Rgba<u8>> + 'static {}

/// An owned output buffer.
pub type Tile = RgbaImage;

/// Render `image` into a `target_width × target_height` buffer, cropping
/// the excess around `focal`.
pub fn render_cover_fit<I: SourceImage>(
    image: &I,
    target_width: u32,
    target_height: u32,
    focal: FocalPoint,
) -> Tile {
    let bounds = image.dimensions();
    let rect = calculate_cover_crop(bounds, (target_width, target_height), focal).to_pixels(bounds);
    tracing::trace!(?bounds, ?rect, target_width, target_height, "cover crop");

    let region = image
        .view(rect.x, rect.y, rect.width, rect.height)
        .to_image();
    if (rect.width, rect.height) == (target_width, target_height) {
        return region;
    }
    imageops::resize(&region, target_width, target_height, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{column, horizontal_gradient, solid, top_bottom};
    use image::DynamicImage;

    #[test]
    fn output_has_target_dimensions() {
        let img = horizontal_gradient(300, 200);
        let out = render_cover_fit(&img, 150, 90, FocalPoint::CENTER);
        assert_eq!(out.dimensions(), (150, 90));
    }

    #[test]
    fn fills_target_without_transparency() {
        let img = solid(400, 100, [10, 20, 30, 255]);
        let out = render_cover_fit(&img, 120, 120, FocalPoint::CENTER);
        assert!(out.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn same_size_crop_is_pixel_exact() {
        // 300x100 into 100x100 with focal x=0 → columns [0, 100) untouched
        let img = horizontal_gradient(300, 100);
        let out = render_cover_fit(&img, 100, 100, FocalPoint::new(0.0, 0.5));
        for x in 0..100 {
            assert_eq!(column(&out, x), column(&img, x));
        }
    }

    #[test]
    fn focal_right_keeps_right_edge() {
        let img = horizontal_gradient(300, 100);
        let out = render_cover_fit(&img, 100, 100, FocalPoint::new(1.0, 0.5));
        assert_eq!(column(&out, 99), column(&img, 299));
        assert_eq!(column(&out, 0), column(&img, 200));
    }

    #[test]
    fn focal_y_selects_rows_on_tall_image() {
        // Top half red, bottom half blue, 100x400 into 100x100
        let img = top_bottom(100, 400);
        let top = render_cover_fit(&img, 100, 100, FocalPoint::new(0.5, 0.0));
        let bottom = render_cover_fit(&img, 100, 100, FocalPoint::new(0.5, 1.0));
        assert_eq!(top.get_pixel(50, 50), img.get_pixel(50, 50));
        assert_eq!(bottom.get_pixel(50, 50), img.get_pixel(50, 350));
    }

    #[test]
    fn accepts_dynamic_image() {
        let img = DynamicImage::ImageRgba8(solid(64, 32, [200, 0, 0, 255]));
        let out = render_cover_fit(&img, 40, 40, FocalPoint::CENTER);
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(out.get_pixel(20, 20).0, [200, 0, 0, 255]);
    }

    #[test]
    fn upscales_small_source() {
        let img = solid(10, 10, [1, 2, 3, 255]);
        let out = render_cover_fit(&img, 55, 50, FocalPoint::CENTER);
        assert_eq!(out.dimensions(), (55, 50));
        assert_eq!(out.get_pixel(27, 25).0, [1, 2, 3, 255]);
    }

    #[test]
    fn deterministic() {
        let img = horizontal_gradient(333, 211);
        let a = render_cover_fit(&img, 97, 120, FocalPoint::new(0.3, 0.8));
        let b = render_cover_fit(&img, 97, 120, FocalPoint::new(0.3, 0.8));
        assert_eq!(a, b);
    }
}
