//! Rare-glyph coverage scan.
//!
//! The hosted web fonts cover the common CJK blocks but not CJK Extension B or
//! Nüshu. Characters from those ranges need small locally built font subsets.
//! This module finds every such character in the content so the subsetter can
//! be fed an exact code point list.
//!
//! ```text
//! content files ──(parallel read)──► per-file GlyphSet ──merge──► GlyphReport
//!                                                                   │
//!                           "U+20000,U+2A6D6"  ◄── unicode_list ────┘
//! ```
//!
//! The whole file is scanned, frontmatter included, since titles render too.
//! Building the woff2 subset itself is left to external font tooling.

use crate::config::{ContentConfig, GlyphRange, GlyphsConfig};
use crate::content::{self, ContentError};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GlyphError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Characters found per range, keyed by range name.
pub type GlyphSet = BTreeMap<String, BTreeSet<char>>;

/// Outcome for one range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    /// Characters found and the source font is present.
    Ready,
    /// No characters from this range; any stale subset can go.
    Empty,
    /// The source font is missing; these characters fall back.
    MissingSource,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeReport {
    pub name: String,
    pub label: String,
    pub source: PathBuf,
    pub status: RangeStatus,
    /// Found characters in code point order.
    pub chars: String,
    /// Comma-separated `U+XXXX` list for the subsetter.
    pub unicodes: String,
}

impl RangeReport {
    pub fn count(&self) -> usize {
        self.chars.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphReport {
    pub files_scanned: usize,
    pub ranges: Vec<RangeReport>,
}

impl GlyphReport {
    /// Total rare characters across all ranges.
    pub fn total(&self) -> usize {
        self.ranges.iter().map(RangeReport::count).sum()
    }
}

/// Record every character of `text` that falls in one of `ranges`.
pub fn collect_glyphs(text: &str, ranges: &[GlyphRange], found: &mut GlyphSet) {
    for c in text.chars() {
        for range in ranges.iter().filter(|r| r.contains(c)) {
            found.entry(range.name.clone()).or_default().insert(c);
        }
    }
}

/// Merge `other` into `into`.
pub fn merge_glyphs(into: &mut GlyphSet, other: GlyphSet) {
    for (name, chars) in other {
        into.entry(name).or_default().extend(chars);
    }
}

/// `U+XXXX` code points joined by commas, at least four hex digits each.
pub fn unicode_list<'a>(chars: impl IntoIterator<Item = &'a char>) -> String {
    chars
        .into_iter()
        .map(|c| format!("U+{:04X}", u32::from(*c)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Scan every content file under `root` for rare glyphs.
///
/// Files are read in parallel on the global rayon pool.
pub fn scan_glyphs(
    root: &Path,
    content: &ContentConfig,
    glyphs: &GlyphsConfig,
) -> Result<GlyphReport, GlyphError> {
    let files = content::content_files(root, &content.extensions)?;
    if files.is_empty() {
        warn!(root = %root.display(), "no content files found");
    }
    info!(files = files.len(), "scanning content for rare glyphs");

    let per_file = files
        .par_iter()
        .map(|path| {
            let text = fs::read_to_string(path).map_err(|source| GlyphError::Read {
                path: path.clone(),
                source,
            })?;
            let mut found = GlyphSet::new();
            collect_glyphs(&text, &glyphs.ranges, &mut found);
            Ok(found)
        })
        .collect::<Result<Vec<GlyphSet>, GlyphError>>()?;

    let mut found = GlyphSet::new();
    for set in per_file {
        merge_glyphs(&mut found, set);
    }

    Ok(build_report(glyphs, &found, files.len(), |p| p.exists()))
}

/// Assemble the per-range report.
///
/// A missing source font takes precedence over an empty range.
pub fn build_report(
    glyphs: &GlyphsConfig,
    found: &GlyphSet,
    files_scanned: usize,
    source_exists: impl Fn(&Path) -> bool,
) -> GlyphReport {
    let empty = BTreeSet::new();
    let ranges = glyphs
        .ranges
        .iter()
        .map(|range| {
            let chars = found.get(&range.name).unwrap_or(&empty);
            let source = glyphs.source_path(range);
            let status = if !source_exists(&source) {
                RangeStatus::MissingSource
            } else if chars.is_empty() {
                RangeStatus::Empty
            } else {
                RangeStatus::Ready
            };
            debug!(range = %range.name, chars = chars.len(), ?status, "glyph range");
            RangeReport {
                name: range.name.clone(),
                label: range.label.clone(),
                source,
                status,
                chars: chars.iter().collect(),
                unicodes: unicode_list(chars),
            }
        })
        .collect();

    GlyphReport {
        files_scanned,
        ranges,
    }
}
