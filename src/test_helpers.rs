//! Shared test utilities for the palimpsestus test suite.
//!
//! Provides entry builders, id extractors, and a small on-disk content tree
//! for loader tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::navigation::build_navigation;
//! use crate::test_helpers::*;
//!
//! let nav = build_navigation(vec![entry("01/00"), entry("01/00-00")]);
//! assert_eq!(ids(&nav.flat_list()), vec!["01/00", "01/00-00"]);
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::naming::parse_id;
use crate::types::{Entry, Frontmatter, Navigation, Node};

// =========================================================================
// Entry and node builders
// =========================================================================

/// Frontmatter with only a title.
pub fn frontmatter(title: &str) -> Frontmatter {
    Frontmatter::titled(title)
}

/// Published entry titled after its id.
pub fn entry(id: &str) -> Entry {
    Entry::new(id, frontmatter(&format!("Title {id}")))
}

/// Draft entry titled after its id.
pub fn draft(id: &str) -> Entry {
    let mut e = entry(id);
    e.data.draft = true;
    e
}

/// Childless node decoded from an id, as the builder would make it.
pub fn node(id: &str) -> Node {
    let parsed = parse_id(id);
    let data = frontmatter(&format!("Title {id}"));
    Node {
        id: id.to_string(),
        section_id: parsed.section_id.to_string(),
        volume: parsed.volume.to_string(),
        depth: parsed.depth(),
        title: data.title.clone(),
        breadcrumb: Vec::new(),
        url: crate::naming::id_to_url(id),
        is_chapter: false,
        data,
        children: Vec::new(),
        has_children: false,
    }
}

/// A two-chapter work with sections, a sub-section, and two drafts.
pub fn sample_work() -> Vec<Entry> {
    vec![
        entry("01/00"),
        entry("01/01"),
        entry("01/01-00"),
        entry("01/01-00-00"),
        entry("01/01-00-01"),
        draft("01/01-01"),
        entry("01/01-02"),
        entry("01/02"),
        draft("01/02-00"),
        entry("01/02-01"),
    ]
}

// =========================================================================
// Extractors
// =========================================================================

/// Ids of a list of node references, in order.
pub fn ids<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
    nodes.iter().map(|n| n.id.as_str()).collect()
}

/// Ids of the root nodes.
pub fn root_ids(nav: &Navigation) -> Vec<&str> {
    nav.chapters.iter().map(|n| n.id.as_str()).collect()
}

/// Ids of a node's direct children.
pub fn child_ids(node: &Node) -> Vec<&str> {
    node.children.iter().map(|n| n.id.as_str()).collect()
}

// =========================================================================
// On-disk content
// =========================================================================

/// Write a content file with YAML frontmatter under `root`.
pub fn write_content(root: &Path, rel: &str, frontmatter_yaml: &str, body: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, format!("---\n{frontmatter_yaml}---\n\n{body}")).unwrap();
}

/// A small novel on disk: one volume, two chapters, one draft section.
pub fn setup_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_content(
        root,
        "01/00.mdx",
        "title: Prologue\nisChapter: true\n",
        "In the beginning.",
    );
    write_content(
        root,
        "01/01.mdx",
        "title: The River\nisChapter: true\n",
        "Chapter one.",
    );
    write_content(
        root,
        "01/01-00.md",
        "title: Crossing\nbreadcrumb:\n  - The River\n",
        "A section.",
    );
    write_content(
        root,
        "01/01-01.mdx",
        "title: Unfinished\ndraft: true\n",
        "Not ready.",
    );
    tmp
}
