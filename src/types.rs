//! Shared types passed between the loader, the navigation builder, and the
//! renderers.
//!
//! Field names serialize in camelCase so that a JSON manifest lines up with
//! the frontmatter keys authors write (`isChapter`, `hasChildren`).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Frontmatter block of a content file.
///
/// Only `title` is required. Everything the navigation engine does not know
/// about is kept in `extra` and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    pub title: String,
    /// Trail of ancestor labels shown above the page title.
    #[serde(default)]
    pub breadcrumb: Vec<String>,
    /// Drafts are dropped before the tree is built.
    #[serde(default)]
    pub draft: bool,
    /// Marks a node that opens a chapter (styled differently in the TOC).
    #[serde(default)]
    pub is_chapter: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Frontmatter {
    /// Frontmatter with just a title and every other field defaulted.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            breadcrumb: Vec::new(),
            draft: false,
            is_chapter: false,
            extra: BTreeMap::new(),
        }
    }
}

/// A raw content unit as produced by the loader.
///
/// `id` follows the `<volume>/<section-path>` convention, e.g. `01/02-00-05`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: String,
    pub data: Frontmatter,
}

impl Entry {
    pub fn new(id: impl Into<String>, data: Frontmatter) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// One node of the navigation tree.
///
/// Each node is owned by exactly one parent's `children` list, or is a root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Full entry id, volume included.
    pub id: String,
    /// Volume-relative dash-joined path (`02-00-05`).
    pub section_id: String,
    pub volume: String,
    /// Number of `-` separators in `section_id`; 0 is a top-level chapter.
    pub depth: usize,
    pub title: String,
    pub breadcrumb: Vec<String>,
    pub url: String,
    pub is_chapter: bool,
    pub data: Frontmatter,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    pub has_children: bool,
}

/// The navigation forest for one build.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Navigation {
    /// Root nodes in reading order: top-level chapters and promoted orphans.
    pub chapters: Vec<Node>,
}

/// Position of a node within the reading order.
///
/// `prev` is `None` on the first node and `next` is `None` on the last; the
/// order never wraps around.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReadingOrder<'a> {
    pub prev: Option<&'a Node>,
    pub current: &'a Node,
    pub next: Option<&'a Node>,
}
