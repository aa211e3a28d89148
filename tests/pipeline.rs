//! End-to-end tests through the public API with the real codec backend.
//!
//! Fixtures are written as PNG and tiles are requested as PNG where pixels
//! are compared, so nothing is lost to JPEG compression.

use carousel_cut::config::{self, TileFormat};
use carousel_cut::imaging::{FocalPoint, PeekSettings, Quality};
use carousel_cut::process::{self, OutputOptions, PeekOptions, ProcessError, SplitOptions};
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let [lo, hi] = (x as u16).to_le_bytes();
        Rgba([lo, hi, (y % 256) as u8, 255])
    })
}

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

fn png_output() -> OutputOptions {
    OutputOptions {
        quality: Quality::default(),
        format: TileFormat::Png,
    }
}

fn load_rgba(path: &Path) -> RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

fn is_close(pixel: &Rgba<u8>, expected: [u8; 3]) -> bool {
    pixel.0[..3]
        .iter()
        .zip(expected)
        .all(|(&a, b)| a.abs_diff(b) <= 3)
}

#[test]
fn split_writes_exact_crops() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("pano.png");
    let img = gradient(900, 300);
    img.save(&source).unwrap();
    let out = tmp.path().join("out");

    let options = SplitOptions {
        output: png_output(),
        ..SplitOptions::default()
    };
    let manifest = process::split(&source, &out, &options, None).unwrap();

    assert_eq!(manifest.tiles.len(), 3);
    for (i, tile) in manifest.tiles.iter().enumerate() {
        assert_eq!(tile.file, format!("pano-{}.png", i + 1));
        let decoded = load_rgba(&out.join(&tile.file));
        assert_eq!(decoded.dimensions(), (300, 300));
        let expected = image::imageops::crop_imm(&img, i as u32 * 300, 0, 300, 300).to_image();
        assert_eq!(decoded, expected, "segment {i} differs from its window");
    }
}

#[test]
fn split_honours_config_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        r#"
[split]
segments = 2
vertical_align = 0.0

[output]
format = "png"
"#,
    )
    .unwrap();
    let config = config::load_config(tmp.path()).unwrap();

    let source = tmp.path().join("tall.png");
    let img = gradient(400, 600);
    img.save(&source).unwrap();
    let out = tmp.path().join("out");

    let manifest =
        process::split(&source, &out, &SplitOptions::from_config(&config), None).unwrap();
    assert_eq!(manifest.tile_size, 200);

    // top-aligned: first row of the tile is row 0 of the source
    let first = load_rgba(&out.join("tall-1.png"));
    assert_eq!(first.get_pixel(0, 0), img.get_pixel(0, 0));
    assert_eq!(first.get_pixel(199, 199), img.get_pixel(199, 199));
}

#[test]
fn split_default_jpeg_output() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("wide.png");
    gradient(1000, 500).save(&source).unwrap();

    let manifest = process::split(&source, tmp.path(), &SplitOptions::default(), None).unwrap();

    assert_eq!(manifest.format, "jpg");
    assert_eq!(manifest.quality, 100);
    for name in ["wide-1.jpg", "wide-2.jpg"] {
        let dims = image::image_dimensions(tmp.path().join(name)).unwrap();
        assert_eq!(dims, (500, 500));
    }
    assert!(tmp.path().join("manifest.json").exists());
}

#[test]
fn peek_from_directory_previews_next_image() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("photos");
    fs::create_dir(&input).unwrap();
    // numbered order puts red first even though blue sorts first by name
    solid(200, 100, [0, 0, 255, 255])
        .save(input.join("020-blue.png"))
        .unwrap();
    solid(200, 200, [255, 0, 0, 255])
        .save(input.join("010-red.png"))
        .unwrap();
    fs::write(input.join("notes.txt"), "ignored").unwrap();

    let sources = process::collect_sources(&[input]).unwrap();
    assert_eq!(sources.len(), 2);

    let out = tmp.path().join("out");
    let options = PeekOptions {
        settings: PeekSettings::new(10, false),
        focal_points: vec![],
        output: png_output(),
    };
    let manifest = process::peek(&sources, &out, &options, None).unwrap();
    assert_eq!(manifest.tile_size, 200);

    let first = load_rgba(&out.join("peek-carousel-1.png"));
    assert_eq!(first.dimensions(), (200, 200));
    // main area from the red image, last 20 columns preview the blue one
    assert!(is_close(first.get_pixel(10, 100), [255, 0, 0]));
    assert!(is_close(first.get_pixel(179, 100), [255, 0, 0]));
    assert!(is_close(first.get_pixel(180, 100), [0, 0, 255]));
    assert!(is_close(first.get_pixel(199, 100), [0, 0, 255]));

    let last = load_rgba(&out.join("peek-carousel-2.png"));
    assert!(is_close(last.get_pixel(0, 0), [0, 0, 255]));
    assert!(is_close(last.get_pixel(199, 199), [0, 0, 255]));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(json["settings"]["mode"], "peek");
    let first_source = json["sources"][0]["path"].as_str().unwrap();
    assert!(first_source.ends_with("010-red.png"));
}

#[test]
fn peek_focal_point_selects_crop() {
    let tmp = TempDir::new().unwrap();
    // left half green, right half blue
    let split_colors = RgbaImage::from_fn(400, 100, |x, _| {
        if x < 200 {
            Rgba([0, 255, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    let a = tmp.path().join("a.png");
    let b = tmp.path().join("b.png");
    split_colors.save(&a).unwrap();
    solid(100, 100, [255, 0, 0, 255]).save(&b).unwrap();

    let options = PeekOptions {
        settings: PeekSettings::new(0, false),
        focal_points: vec![FocalPoint::new(1.0, 0.5)],
        output: png_output(),
    };
    process::peek(&[a, b], tmp.path(), &options, None).unwrap();

    // 400x400 tile from a 400x100 source: focal x=1 keeps the right (blue) edge
    let first = load_rgba(&tmp.path().join("peek-carousel-1.png"));
    assert_eq!(first.dimensions(), (400, 400));
    assert!(is_close(first.get_pixel(200, 200), [0, 0, 255]));
}

#[test]
fn peek_rejects_single_image() {
    let tmp = TempDir::new().unwrap();
    let only = tmp.path().join("only.png");
    solid(50, 50, [0, 0, 0, 255]).save(&only).unwrap();

    let result = process::peek(&[only], tmp.path(), &PeekOptions::default(), None);
    assert!(matches!(result, Err(ProcessError::NotEnoughImages { found: 1 })));
}

#[test]
fn plan_reads_header_only() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("pano.png");
    gradient(2400, 800).save(&source).unwrap();

    let plan = process::plan(&source, None, 0.5).unwrap();
    assert_eq!((plan.width, plan.height), (2400, 800));
    assert_eq!(plan.segments, 3);
    assert_eq!(plan.boundaries, vec![0, 800, 1600]);
}

#[test]
fn missing_source_is_reported() {
    let tmp = TempDir::new().unwrap();
    let result = process::split(
        &tmp.path().join("nope.jpg"),
        tmp.path(),
        &SplitOptions::default(),
        None,
    );
    assert!(matches!(result, Err(ProcessError::SourceNotFound(_))));
}
