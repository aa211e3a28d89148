//! Filename conventions for inputs and generated tiles.
//!
//! ## Input ordering
//!
//! Peek carousels are order-sensitive. When inputs come from a directory they
//! follow the `NNN-name` convention: an optional numeric prefix (`NNN-`)
//! followed by a name. Numbered files sort by number; unnumbered files come
//! after, by name.
//!
//! - `010-harbor.jpg` → number 10
//! - `002-dunes.jpg` → number 2 (sorts before `010-harbor.jpg`)
//! - `beach.jpg` → unnumbered (sorts after every numbered file)
//!
//! ## Output naming
//!
//! Tiles are named `{stem}-{n}.{ext}` with a 1-based `n`. The stem is the
//! source filename without its extension (split mode) or a fixed name
//! (peek mode, [`PEEK_STEM`]).

use std::cmp::Ordering;
use std::path::Path;

/// Stem used when a split source has no usable filename.
pub const DEFAULT_STEM: &str = "carousel";
/// Stem for every peek carousel tile.
pub const PEEK_STEM: &str = "peek-carousel";

/// Result of parsing a numbered entry name like `020-Harbor-At-Dusk`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `20` from `020-Harbor-At-Dusk`)
    pub number: Option<u32>,
    /// Raw name part after `NNN-`, dashes preserved. Empty if number-only.
    /// For unnumbered entries, this is the full input.
    pub name: String,
}

/// Parse an entry name following the `NNN-name` convention.
///
/// - `"020-Harbor-At-Dusk"` → number=Some(20), name="Harbor-At-Dusk"
/// - `"001"` → number=Some(1), name=""
/// - `"beach-day"` → number=None, name="beach-day"
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            name: rest.to_string(),
        };
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            name: String::new(),
        };
    }
    ParsedName {
        number: None,
        name: name.to_string(),
    }
}

/// Sequence order for two source files: numbered first (by number), then by filename.
pub fn compare_sources(a: &Path, b: &Path) -> Ordering {
    let key = |p: &Path| {
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let filename = p.file_name().map(|s| s.to_string_lossy().into_owned());
        (parse_entry_name(&stem).number.unwrap_or(u32::MAX), filename)
    };
    key(a).cmp(&key(b))
}

/// Output stem for a split source: its filename with the last extension removed.
pub fn output_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_STEM.to_string())
}

/// Filename for tile `index` (0-based) of a carousel.
pub fn tile_filename(stem: &str, index: usize, extension: &str) -> String {
    format!("{}-{}.{}", stem, index + 1, extension)
}
