//! Image geometry and compositing in pure Rust, no system libraries.
//!
//! | Operation | Function |
//! |---|---|
//! | **Suggest count** | [`optimal_segment_count`] |
//! | **Overlay geometry** | [`segment_boundaries`], [`calculate_segment_overlay`] |
//! | **Cover-fit** | [`render_cover_fit`] |
//! | **Split** | [`split_into_segments`] |
//! | **Peek** | [`compose_peek_sequence`] |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for crop and layout math (unit testable)
//! - **Parameters**: Clamped value types describing an operation
//! - **Renderers**: `cover`, `split`, `peek`: pixels in, owned tiles out
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`] for decode/encode
//!
//! The renderers are stateless: every output is rebuilt from the explicit
//! arguments, and nothing is cached between calls.

pub mod backend;
mod calculations;
mod cover;
mod params;
pub mod peek;
pub mod rust_backend;
mod split;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    CropRect, MAX_SEGMENTS, MIN_SEGMENTS, PeekLayout, PixelRect, SegmentCrop, SegmentOverlay,
    calculate_cover_crop, calculate_peek_layout, calculate_segment_crop, calculate_segment_overlay,
    optimal_segment_count, segment_boundaries, segment_side,
};
pub use cover::{SourceImage, Tile, render_cover_fit};
pub use params::{FocalPoint, MAX_PEEK_PERCENT, PeekSettings, Quality, SaveParams};
pub use peek::compose_peek_sequence;
pub use rust_backend::{RustBackend, is_supported_input, supported_input_extensions};
pub use split::split_into_segments;
