//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every node leads with its positional index and title. The id and URL
//! follow as secondary context, so the listing reads as a table of contents
//! first and a routing table second.
//!
//! # Output Format
//!
//! ## Navigation
//!
//! ```text
//! Volume 01
//! 001 Prologue → /01/00/
//! 002 The River → /01/01/
//!     001 Crossing → /01/01/00/
//!         001 Ford → /01/01/00/00/
//!
//! 4 entries in 1 volume
//! ```
//!
//! ## Reading order
//!
//! ```text
//! Prev:    01/00 Prologue → /01/00/
//! Current: 01/01 The River → /01/01/
//! Next:    (none)
//! ```
//!
//! ## Check
//!
//! ```text
//! Checked 4 entries (1 draft skipped)
//! Orphans
//!     01/03-02 (missing parent 01/03)
//! Duplicates
//!     01/01
//! 2 problems found
//! ```
//!
//! ## Glyphs
//!
//! ```text
//! Scanned 12 content files
//! → CJKExtB-Serif: 2 chars [𠀀𪛖]
//!     U+20000,U+2A6D6
//! · NushuSerif: no characters found
//! Total rare characters: 2
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::glyphs::{GlyphReport, RangeStatus};
use crate::navigation::BuildReport;
use crate::types::{Navigation, Node, ReadingOrder};

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

/// Count with the matching noun form: `1 volume`, `2 volumes`.
fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// `id title → url` for a single node.
fn node_line(node: &Node) -> String {
    format!("{} {} \u{2192} {}", node.id, node.title, node.url)
}

// ============================================================================
// Tree walker
// ============================================================================

/// A flattened node from walking the navigation tree.
struct TreeNode<'a> {
    /// Tree level, not id depth: promoted orphans sit at level 0.
    level: usize,
    position: usize,
    node: &'a Node,
}

/// Walk the tree, assigning positional indices per sibling level.
fn walk_tree(roots: &[Node]) -> Vec<TreeNode<'_>> {
    let mut nodes = Vec::new();
    walk_tree_recursive(roots, 0, &mut nodes);
    nodes
}

fn walk_tree_recursive<'a>(items: &'a [Node], level: usize, nodes: &mut Vec<TreeNode<'a>>) {
    for (i, node) in items.iter().enumerate() {
        nodes.push(TreeNode {
            level,
            position: i + 1,
            node,
        });
        walk_tree_recursive(&node.children, level + 1, nodes);
    }
}

// ============================================================================
// Navigation
// ============================================================================

/// Format the navigation tree, grouped under a header per volume.
pub fn format_navigation_output(nav: &Navigation) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_volume: Option<&str> = None;
    let mut root_position = 0;

    for tree_node in walk_tree(&nav.chapters) {
        let node = tree_node.node;
        // Root positions restart per volume.
        let position = if tree_node.level == 0 {
            if current_volume != Some(node.volume.as_str()) {
                if current_volume.is_some() {
                    lines.push(String::new());
                }
                lines.push(format!("Volume {}", node.volume));
                current_volume = Some(node.volume.as_str());
                root_position = 0;
            }
            root_position += 1;
            root_position
        } else {
            tree_node.position
        };

        lines.push(format!(
            "{}{} {} \u{2192} {}",
            indent(tree_node.level),
            format_index(position),
            node.title,
            node.url
        ));
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{} in {}",
        plural(nav.len(), "entry", "entries"),
        plural(nav.volumes().len(), "volume", "volumes")
    ));
    lines
}

pub fn print_navigation_output(nav: &Navigation) {
    for line in format_navigation_output(nav) {
        println!("{}", line);
    }
}

// ============================================================================
// Reading order
// ============================================================================

pub fn format_reading_order(order: &ReadingOrder<'_>) -> Vec<String> {
    let side = |node: Option<&Node>| node.map(node_line).unwrap_or_else(|| "(none)".to_string());
    vec![
        format!("Prev:    {}", side(order.prev)),
        format!("Current: {}", node_line(order.current)),
        format!("Next:    {}", side(order.next)),
    ]
}

pub fn print_reading_order(order: &ReadingOrder<'_>) {
    for line in format_reading_order(order) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format build diagnostics: orphans, duplicates, and a verdict line.
pub fn format_check_output(nav: &Navigation, report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Checked {} ({} skipped)",
        plural(nav.len(), "entry", "entries"),
        plural(report.drafts.len(), "draft", "drafts")
    ));

    let orphans: Vec<(&str, &str)> = report.orphans().collect();
    if !orphans.is_empty() {
        lines.push("Orphans".to_string());
        for (id, missing) in &orphans {
            lines.push(format!("    {} (missing parent {})", id, missing));
        }
    }

    if !report.duplicates.is_empty() {
        lines.push("Duplicates".to_string());
        for id in &report.duplicates {
            lines.push(format!("    {}", id));
        }
    }

    let problems = orphans.len() + report.duplicates.len();
    if problems == 0 {
        lines.push("Content is valid".to_string());
    } else {
        lines.push(format!("{} found", plural(problems, "problem", "problems")));
    }
    lines
}

pub fn print_check_output(nav: &Navigation, report: &BuildReport) {
    for line in format_check_output(nav, report) {
        println!("{}", line);
    }
}

// ============================================================================
// Glyphs
// ============================================================================

/// Format the rare-glyph report, one block per configured range.
pub fn format_glyph_report(report: &GlyphReport) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Scanned {}",
        plural(report.files_scanned, "content file", "content files")
    ));

    for range in &report.ranges {
        match range.status {
            RangeStatus::MissingSource => {
                lines.push(format!(
                    "\u{26a0} {}: source font not found: {}",
                    range.name,
                    range.source.display()
                ));
                lines.push(format!(
                    "    {} characters will show as fallback",
                    range.label
                ));
            }
            RangeStatus::Empty => {
                lines.push(format!("\u{b7} {}: no characters found", range.name));
            }
            RangeStatus::Ready => {
                lines.push(format!(
                    "\u{2192} {}: {} [{}]",
                    range.name,
                    plural(range.count(), "char", "chars"),
                    range.chars
                ));
                lines.push(format!("    {}", range.unicodes));
            }
        }
    }

    lines.push(format!("Total rare characters: {}", report.total()));
    lines
}

pub fn print_glyph_report(report: &GlyphReport) {
    for line in format_glyph_report(report) {
        println!("{}", line);
    }
}
