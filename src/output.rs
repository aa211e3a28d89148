//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity (source, tile) leads with its positional index, with
//! filesystem paths and measurements shown as indented context lines. The
//! same two-level pattern is used for planning, progress, and the final
//! summary, so one image looks the same wherever it appears.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! pano.jpg (3000x1000)
//!     Segments: 3 (suggested 3)
//!     Side: 1000px
//!     Boundaries: 0, 1000, 2000
//!     Crop window: full height
//! ```
//!
//! ## Progress
//!
//! ```text
//! 001 pano.jpg (3000x1000)
//!     Source: photos/pano.jpg
//! Rendered 3 tiles at 1000x1000
//!     → out/pano-2.jpg
//! ```
//!
//! ## Summary
//!
//! ```text
//! Split carousel: 3 tiles, 1000x1000 jpg (quality 100)
//! 001 pano-1.jpg
//! 002 pano-2.jpg
//! 003 pano-3.jpg
//! Manifest: out/manifest.json
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::process::{ProcessEvent, SplitPlan};
use crate::types::{CarouselManifest, CarouselSettings, MANIFEST_FILENAME};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Last path component, or the whole string when there is none.
fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

// ============================================================================
// Plan
// ============================================================================

/// Format split geometry for an image, without rendering anything.
pub fn format_plan(plan: &SplitPlan) -> Vec<String> {
    let boundaries: Vec<String> = plan.boundaries.iter().map(|b| b.to_string()).collect();
    let window = if plan.overlay.adjustable {
        format!(
            "{} of height, top at {}",
            percent(plan.overlay.crop_height_fraction),
            percent(plan.overlay.crop_top_fraction)
        )
    } else if plan.side > plan.height {
        format!("full height, stretched to {}px", plan.side)
    } else {
        "full height".to_string()
    };

    vec![
        format!(
            "{} ({}x{})",
            display_name(&plan.path),
            plan.width,
            plan.height
        ),
        format!(
            "{}Segments: {} (suggested {})",
            indent(1),
            plan.segments,
            plan.suggested_segments
        ),
        format!("{}Side: {}px", indent(1), plan.side),
        format!("{}Boundaries: {}", indent(1), boundaries.join(", ")),
        format!("{}Crop window: {}", indent(1), window),
    ]
}

/// Print split geometry to stdout.
pub fn print_plan(plan: &SplitPlan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::SourceLoaded {
            index,
            path,
            width,
            height,
        } => vec![
            format!(
                "{} {} ({}x{})",
                format_index(*index),
                display_name(path),
                width,
                height
            ),
            format!("{}Source: {}", indent(1), path),
        ],
        ProcessEvent::TilesRendered { count, size } => {
            vec![format!("Rendered {} tiles at {}x{}", count, size, size)]
        }
        ProcessEvent::TileWritten { path, .. } => vec![format!("{}\u{2192} {}", indent(1), path)],
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the finished carousel: settings line, tiles in posting order, manifest path.
pub fn format_manifest_summary(manifest: &CarouselManifest, output_dir: &Path) -> Vec<String> {
    let mode = match &manifest.settings {
        CarouselSettings::Split { .. } => "Split carousel".to_string(),
        CarouselSettings::Peek { percent, blur } => format!(
            "Peek carousel ({}% peek{})",
            percent,
            if *blur { ", blurred" } else { "" }
        ),
    };

    let mut lines = vec![format!(
        "{}: {} tiles, {}x{} {} (quality {})",
        mode,
        manifest.tiles.len(),
        manifest.tile_size,
        manifest.tile_size,
        manifest.format,
        manifest.quality
    )];
    for tile in &manifest.tiles {
        lines.push(format!("{} {}", format_index(tile.position), tile.file));
    }
    lines.push(format!("Manifest: {}", output_dir.join(MANIFEST_FILENAME).display()));
    lines
}

/// Print the finished carousel summary to stdout.
pub fn print_manifest_summary(manifest: &CarouselManifest, output_dir: &Path) {
    for line in format_manifest_summary(manifest, output_dir) {
        println!("{}", line);
    }
}
