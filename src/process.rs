//! Carousel orchestration: sources in, tile files and a manifest out.
//!
//! The imaging core is pure. This module does everything around it:
//! resolving input paths, decoding through an [`ImageBackend`], choosing
//! defaults from config, encoding the finished tiles, and recording the
//! result in `manifest.json`.
//!
//! ## Output Structure
//!
//! ```text
//! out/
//! ├── manifest.json
//! ├── pano-1.jpg          # split: {source stem}-{n}
//! ├── pano-2.jpg
//! └── pano-3.jpg
//! ```
//!
//! Peek carousels use the fixed stem `peek-carousel`.
//!
//! ## Parallel Processing
//!
//! Tiles are encoded in parallel using [rayon](https://docs.rs/rayon); the
//! peek compositor also pre-renders its wide buffers in parallel. Progress is
//! reported as [`ProcessEvent`]s over an optional channel so the CLI can
//! print while work continues.

use crate::config::{CarouselConfig, TileFormat};
use crate::imaging::{
    BackendError, FocalPoint, ImageBackend, MAX_SEGMENTS, MIN_SEGMENTS, PeekSettings, Quality,
    RustBackend, SaveParams, SegmentOverlay, Tile, calculate_segment_overlay, compose_peek_sequence,
    is_supported_input, optimal_segment_count, segment_boundaries, segment_side,
    split_into_segments,
};
use crate::naming::{PEEK_STEM, compare_sources, output_stem, tile_filename};
use crate::types::{CarouselManifest, CarouselSettings, MANIFEST_FILENAME, SourceRecord, TileRecord};
use image::{DynamicImage, GenericImageView};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("No supported images in {0}")]
    NoImages(PathBuf),
    #[error("A peek carousel needs at least 2 images, found {found}")]
    NotEnoughImages { found: usize },
}

/// Progress reported while building a carousel.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// A source was decoded. `index` is 1-based in sequence order.
    SourceLoaded {
        index: usize,
        path: String,
        width: u32,
        height: u32,
    },
    /// All tiles are composed and about to be encoded.
    TilesRendered { count: usize, size: u32 },
    /// One tile file was written. Arrives in completion order, not position order.
    TileWritten { position: usize, path: String },
}

/// How finished tiles are encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub quality: Quality,
    pub format: TileFormat,
}

impl OutputOptions {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            quality: config.output.quality(),
            format: config.output.tile_format(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Fixed count, or `None` for [`optimal_segment_count`].
    pub segments: Option<u32>,
    pub vertical_align: f64,
    pub output: OutputOptions,
}

impl SplitOptions {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            segments: config.split.segments,
            vertical_align: config.split.vertical_align,
            output: OutputOptions::from_config(config),
        }
    }
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

#[derive(Debug, Clone)]
pub struct PeekOptions {
    pub settings: PeekSettings,
    /// Focal point per source, in sequence order. Missing entries are centered.
    pub focal_points: Vec<FocalPoint>,
    pub output: OutputOptions,
}

impl PeekOptions {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            settings: config.peek.settings(),
            focal_points: Vec::new(),
            output: OutputOptions::from_config(config),
        }
    }
}

impl Default for PeekOptions {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

/// Geometry of a split, computed from the image header alone.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    pub path: String,
    pub width: u32,
    pub height: u32,
    /// What [`optimal_segment_count`] recommends for this image.
    pub suggested_segments: u32,
    /// Count the plan was made for (requested, clamped, or suggested).
    pub segments: u32,
    pub side: u32,
    pub boundaries: Vec<u32>,
    pub overlay: SegmentOverlay,
}

/// Resolve CLI inputs to an ordered list of image files.
///
/// Files are taken as given, in argument order. Directories contribute their
/// supported images (not recursing), ordered by `NNN-` prefix then filename.
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, ProcessError> {
    let mut sources = Vec::new();
    for input in inputs {
        if !input.exists() {
            return Err(ProcessError::SourceNotFound(input.clone()));
        }
        if !input.is_dir() {
            sources.push(input.clone());
            continue;
        }

        let mut found: Vec<PathBuf> = WalkDir::new(input)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_supported_input(e.path()))
            .map(|e| e.into_path())
            .collect();
        if found.is_empty() {
            return Err(ProcessError::NoImages(input.clone()));
        }
        found.sort_by(|a, b| compare_sources(a, b));
        sources.extend(found);
    }
    Ok(sources)
}

/// Compute the split geometry for `source` without decoding pixels.
pub fn plan_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
    segments: Option<u32>,
    vertical_align: f64,
) -> Result<SplitPlan, ProcessError> {
    if !source.exists() {
        return Err(ProcessError::SourceNotFound(source.to_path_buf()));
    }
    let dims = backend.identify(source)?;
    let suggested = optimal_segment_count(dims.width, dims.height);
    let count = segments
        .map(|n| n.clamp(MIN_SEGMENTS, MAX_SEGMENTS))
        .unwrap_or(suggested);

    Ok(SplitPlan {
        path: source.display().to_string(),
        width: dims.width,
        height: dims.height,
        suggested_segments: suggested,
        segments: count,
        side: segment_side(dims.width, count),
        boundaries: segment_boundaries(dims.width, count),
        overlay: calculate_segment_overlay(dims.into(), count, vertical_align),
    })
}

pub fn plan(
    source: &Path,
    segments: Option<u32>,
    vertical_align: f64,
) -> Result<SplitPlan, ProcessError> {
    plan_with_backend(&RustBackend::new(), source, segments, vertical_align)
}

pub fn split(
    source: &Path,
    output_dir: &Path,
    options: &SplitOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<CarouselManifest, ProcessError> {
    split_with_backend(&RustBackend::new(), source, output_dir, options, progress)
}

/// Split one wide image into square tiles using a specific backend (allows testing with mock).
pub fn split_with_backend(
    backend: &impl ImageBackend,
    source: &Path,
    output_dir: &Path,
    options: &SplitOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<CarouselManifest, ProcessError> {
    let image = load_source(backend, source, 1, progress.as_ref())?;
    let (width, height) = image.dimensions();

    let segments = options
        .segments
        .map(|n| n.clamp(MIN_SEGMENTS, MAX_SEGMENTS))
        .unwrap_or_else(|| optimal_segment_count(width, height));
    let tiles = split_into_segments(&image, segments, options.vertical_align);
    emit_rendered(&tiles, progress.as_ref());

    std::fs::create_dir_all(output_dir)?;
    let records = write_tiles(
        backend,
        &tiles,
        output_dir,
        &output_stem(source),
        &options.output,
        progress.as_ref(),
    )?;

    let manifest = CarouselManifest {
        settings: CarouselSettings::Split {
            segments,
            vertical_align: options.vertical_align,
        },
        tile_size: tile_size(&tiles),
        format: options.output.format.extension().to_string(),
        quality: options.output.quality.value(),
        sources: vec![SourceRecord {
            path: source.display().to_string(),
            width,
            height,
            focal: None,
        }],
        tiles: records,
    };
    write_manifest(output_dir, &manifest)?;
    Ok(manifest)
}

pub fn peek(
    sources: &[PathBuf],
    output_dir: &Path,
    options: &PeekOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<CarouselManifest, ProcessError> {
    peek_with_backend(&RustBackend::new(), sources, output_dir, options, progress)
}

/// Build a peek carousel from `sources` (in sequence order) using a specific backend.
pub fn peek_with_backend(
    backend: &impl ImageBackend,
    sources: &[PathBuf],
    output_dir: &Path,
    options: &PeekOptions,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<CarouselManifest, ProcessError> {
    if sources.len() < 2 {
        return Err(ProcessError::NotEnoughImages {
            found: sources.len(),
        });
    }

    let images = sources
        .iter()
        .enumerate()
        .map(|(i, path)| load_source(backend, path, i + 1, progress.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let tiles = compose_peek_sequence(&images, options.settings, &options.focal_points);
    emit_rendered(&tiles, progress.as_ref());

    std::fs::create_dir_all(output_dir)?;
    let records = write_tiles(
        backend,
        &tiles,
        output_dir,
        PEEK_STEM,
        &options.output,
        progress.as_ref(),
    )?;

    let source_records = sources
        .iter()
        .zip(&images)
        .enumerate()
        .map(|(i, (path, image))| SourceRecord {
            path: path.display().to_string(),
            width: image.width(),
            height: image.height(),
            focal: Some(options.focal_points.get(i).copied().unwrap_or_default()),
        })
        .collect();

    let manifest = CarouselManifest {
        settings: CarouselSettings::Peek {
            percent: options.settings.percent(),
            blur: options.settings.blur,
        },
        tile_size: tile_size(&tiles),
        format: options.output.format.extension().to_string(),
        quality: options.output.quality.value(),
        sources: source_records,
        tiles: records,
    };
    write_manifest(output_dir, &manifest)?;
    Ok(manifest)
}

fn load_source(
    backend: &impl ImageBackend,
    path: &Path,
    index: usize,
    progress: Option<&Sender<ProcessEvent>>,
) -> Result<DynamicImage, ProcessError> {
    if !path.exists() {
        return Err(ProcessError::SourceNotFound(path.to_path_buf()));
    }
    let image = backend.load(path)?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "decoded source"
    );
    if let Some(tx) = progress {
        tx.send(ProcessEvent::SourceLoaded {
            index,
            path: path.display().to_string(),
            width: image.width(),
            height: image.height(),
        })
        .ok();
    }
    Ok(image)
}

fn emit_rendered(tiles: &[Tile], progress: Option<&Sender<ProcessEvent>>) {
    if let Some(tx) = progress {
        tx.send(ProcessEvent::TilesRendered {
            count: tiles.len(),
            size: tile_size(tiles),
        })
        .ok();
    }
}

fn tile_size(tiles: &[Tile]) -> u32 {
    tiles.first().map(|t| t.width()).unwrap_or(0)
}

/// Encode all tiles in parallel. Records come back in position order.
fn write_tiles(
    backend: &impl ImageBackend,
    tiles: &[Tile],
    output_dir: &Path,
    stem: &str,
    output: &OutputOptions,
    progress: Option<&Sender<ProcessEvent>>,
) -> Result<Vec<TileRecord>, ProcessError> {
    let extension = output.format.extension();
    tiles
        .par_iter()
        .enumerate()
        .map(|(i, tile)| {
            let file = tile_filename(stem, i, extension);
            let path = output_dir.join(&file);
            backend.save(
                tile,
                &SaveParams {
                    output: path.clone(),
                    quality: output.quality,
                },
            )?;
            if let Some(tx) = progress {
                tx.send(ProcessEvent::TileWritten {
                    position: i + 1,
                    path: path.display().to_string(),
                })
                .ok();
            }
            Ok(TileRecord {
                position: i + 1,
                file,
            })
        })
        .collect()
}

fn write_manifest(output_dir: &Path, manifest: &CarouselManifest) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(output_dir.join(MANIFEST_FILENAME), json)?;
    Ok(())
}
