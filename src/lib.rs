//! # Palimpsestus
//!
//! Navigation engine for a serialized novel published as a static site.
//! Every content file carries a hierarchical id, and the id alone decides
//! where the file sits in the table of contents and the reading order.
//!
//! # Id Scheme
//!
//! ```text
//! 01/02-00-05
//! ── ────────
//!  │    └── section id: 02 = chapter, 02-00 = section, 02-00-05 = sub-section
//!  └── volume
//! ```
//!
//! The parent of a section is its section id with the last `-segment`
//! dropped, in the same volume. URLs mirror the id: `01/02-00-05` is served
//! at `/01/02/00/05/`.
//!
//! # Pipeline
//!
//! ```text
//! content/  ──load──►  Vec<Entry>  ──build──►  Navigation (tree)
//!                                                  │
//!                          flat_list (pre-order) ◄─┤
//!                          reading_order(id)     ◄─┤
//!                          render_toc / pager    ◄─┘
//! ```
//!
//! Building is a pure function of the entry list. Drafts are dropped before
//! any linking, entries whose parent is missing become roots rather than
//! disappearing, and input order never affects the result.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Shared data: `Entry`, `Frontmatter`, `Node`, `Navigation`, `ReadingOrder` |
//! | [`naming`] | Id decoding: volume, section id, depth, parent, URL |
//! | [`navigation`] | Tree construction, pre-order flattening, prev/next lookup, build diagnostics |
//! | [`content`] | Walks the content directory and parses YAML frontmatter into entries |
//! | [`glyphs`] | Finds rare CJK Extension B and Nüshu characters for font subsetting |
//! | [`toc`] | Maud-rendered table of contents, breadcrumb, and pager fragments |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |

pub mod config;
pub mod content;
pub mod glyphs;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod toc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

use std::path::Path;
use thiserror::Error;

/// Any failure surfaced by the library's top-level operations.
#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Content error: {0}")]
    Content(#[from] content::ContentError),
    #[error("Glyph scan error: {0}")]
    Glyphs(#[from] glyphs::GlyphError),
    #[error("Unknown entry id: {0}")]
    UnknownId(String),
}

/// Load `config.toml` from `site_dir` and every entry under its content root.
pub fn load_site(site_dir: &Path) -> Result<(config::SiteConfig, Vec<types::Entry>), SiteError> {
    let config = config::load_config(site_dir)?;
    let entries = content::load_entries(&config.content_dir(site_dir), &config.content)?;
    Ok((config, entries))
}
