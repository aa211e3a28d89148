//! # Carousel Cut
//!
//! Turns photos into square tiles for swipeable social-media carousels.
//!
//! Two modes:
//!
//! - **Split**: one wide panorama is cut into 2-10 equal square segments that
//!   read as one continuous image when swiped.
//! - **Peek**: a sequence of photos becomes one tile each, and every tile but
//!   the last shows a thin strip of the next photo on its right edge, hinting
//!   that there is more to swipe. The strip can be blurred.
//!
//! # Architecture
//!
//! ```text
//! inputs  →  process (decode via backend)  →  imaging (pure)  →  process (encode)  →  out/
//! ```
//!
//! The [`imaging`] core is pure: pixel buffers in, owned tiles out, no I/O and
//! no state between calls. Everything touching the filesystem goes through the
//! [`imaging::ImageBackend`] trait, so orchestration is tested against a mock.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Segment geometry, cover-fit, split and peek renderers, codec backend |
//! | [`process`] | Orchestration: collect sources, decode, render, encode in parallel, write manifest |
//! | [`config`] | `config.toml` loading: stock defaults, sparse overrides, validation |
//! | [`naming`] | `NNN-name` input ordering and `{stem}-{n}` tile names |
//! | [`types`] | The `manifest.json` record of a finished carousel |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Square Tiles Only
//!
//! Carousel platforms crop anything else. Split segments are squares of side
//! `round(width / count)`; peek tiles are squares sized to the largest
//! dimension among the inputs, so no photo is ever downscaled.
//!
//! ## Exact Pixel Seams
//!
//! Adjacent split segments share a boundary column with no gap or overlap,
//! and a peek tile's strip is the same pixels the next tile starts with. Both
//! are built from the same cover-fit render, so swiping reads as one motion.
//!
//! ## NNN-Prefix Ordering
//!
//! When peek inputs come from a directory, files with a numeric prefix
//! (`001-`, `020-`) come first in number order, then the rest by name. This is
//! parsed by [`naming::parse_entry_name`].

pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
