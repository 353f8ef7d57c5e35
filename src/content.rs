//! Content loading.
//!
//! Walks the content directory and turns every content file into an
//! [`Entry`]: an id derived from the file's path and the parsed frontmatter.
//! This is the only place the navigation pipeline touches the filesystem.
//!
//! ## Directory Structure
//!
//! ```text
//! src/content/novel/               # content_root
//! ├── 01/                          # volume 01
//! │   ├── 00.mdx                   # id 01/00        (chapter)
//! │   ├── 01.mdx                   # id 01/01        (chapter)
//! │   ├── 01-00.mdx                # id 01/01-00     (section)
//! │   └── 01-00-05.md              # id 01/01-00-05  (sub-section)
//! └── .drafts/                     # hidden: never loaded
//! ```
//!
//! The id is the path relative to the content root with the extension
//! dropped and separators normalized to `/`.
//!
//! ## Frontmatter
//!
//! Each file starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: The River
//! breadcrumb: [Book One]
//! isChapter: true
//! draft: false
//! ---
//! ```
//!
//! Only `title` is required. The body after the closing fence is not read.

use crate::config::ContentConfig;
use crate::types::{Entry, Frontmatter};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content directory not found: {0}")]
    MissingRoot(PathBuf),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("No frontmatter block in {0}")]
    MissingFrontmatter(PathBuf),
    #[error("Invalid frontmatter in '{path}': {source}")]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Load every content entry under `root`, sorted by id.
///
/// Drafts are included; filtering them is the navigation builder's job.
pub fn load_entries(root: &Path, config: &ContentConfig) -> Result<Vec<Entry>, ContentError> {
    let files = content_files(root, &config.extensions)?;

    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        let Some(id) = entry_id(root, path) else {
            continue;
        };
        let text = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.clone(),
            source,
        })?;
        entries.push(parse_entry(id, &text, path)?);
    }

    entries.sort_by(|a, b| a.id.cmp(&b.id));
    info!(
        root = %root.display(),
        entries = entries.len(),
        "content loaded"
    );
    Ok(entries)
}

/// All content files under `root` with one of `extensions`, sorted by path.
///
/// Hidden files and directories (leading `.`) are skipped.
pub fn content_files(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>, ContentError> {
    if !root.is_dir() {
        return Err(ContentError::MissingRoot(root.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

    for dir_entry in walker {
        let dir_entry = dir_entry?;
        if dir_entry.file_type().is_file() && has_extension(dir_entry.path(), extensions) {
            files.push(dir_entry.into_path());
        }
    }

    files.sort();
    debug!(root = %root.display(), files = files.len(), "content files found");
    Ok(files)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            extensions.iter().any(|e| ext.eq_ignore_ascii_case(e))
        })
        .unwrap_or(false)
}

/// Entry id for a content file: relative path, extension dropped, `/`-joined.
///
/// Returns `None` when `path` is not under `root`.
pub fn entry_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Split a document into its YAML frontmatter and the body that follows.
///
/// The document must open with a `---` line; the block ends at the next line
/// that is exactly `---`. Returns `None` if either fence is missing.
pub fn split_frontmatter(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rest = text.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse one document's frontmatter into an entry.
///
/// `path` is only used for error messages.
pub fn parse_entry(id: String, text: &str, path: &Path) -> Result<Entry, ContentError> {
    let (yaml, _body) =
        split_frontmatter(text).ok_or_else(|| ContentError::MissingFrontmatter(path.to_path_buf()))?;
    let data: Frontmatter =
        serde_yaml::from_str(yaml).map_err(|source| ContentError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(Entry { id, data })
}
