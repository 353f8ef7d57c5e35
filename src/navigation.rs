//! Document hierarchy and reading order.
//!
//! Turns the flat entry list from the loader into one tree per volume and a
//! pre-order reading sequence used for prev/next links.
//!
//! ## Construction
//!
//! ```text
//! entries ─► drop drafts ─► sort by id ─► raw nodes
//!                                            │
//!          pass 1: attach (arena indices) ◄──┘
//!                  │
//!          pass 2: materialize owned tree, derive has_children
//!                  │
//!                  ▼
//!            Navigation { chapters }  ──flatten──►  reading order
//! ```
//!
//! Parents are inferred purely from ids: the parent of `02-00-05` is `02-00`
//! in the same volume. Nodes are processed in `(volume, section_id)` order,
//! which is reading order because section tokens are zero-padded.
//!
//! ## Degradation, not failure
//!
//! A malformed content set never fails the build:
//!
//! - **Missing parent** (a gap such as `02-00-05` without `02-00`): the node is
//!   promoted to a root. The tree comes out flatter; nothing is dropped.
//! - **Duplicate ids**: the later entry wins the parent lookup. Both nodes
//!   still appear in the tree.
//!
//! Both cases are logged at `warn` and listed in the [`BuildReport`].
//!
//! The lookup map is keyed by `(volume, section_id)`, so two volumes that
//! reuse the same section ids never cross-attach.

use crate::naming::{self, parse_id};
use crate::types::{Entry, Navigation, Node, ReadingOrder};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// How a node ended up in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Placement {
    /// Section id has no `-`: a top-level chapter.
    Root,
    /// Appended to the children of the node with this id.
    Attached { parent: String },
    /// The inferred parent does not exist; promoted to a root.
    #[serde(rename_all = "camelCase")]
    PromotedOrphan { missing_parent: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedNode {
    pub id: String,
    pub placement: Placement,
}

/// Diagnostics collected while building the navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildReport {
    /// Ids of draft entries that were filtered out.
    pub drafts: Vec<String>,
    /// Placement of every published node, in construction order.
    pub placements: Vec<PlacedNode>,
    /// Ids whose `(volume, section_id)` key was already taken.
    pub duplicates: Vec<String>,
}

impl BuildReport {
    /// `(id, missing_parent)` for every promoted orphan.
    pub fn orphans(&self) -> impl Iterator<Item = (&str, &str)> {
        self.placements.iter().filter_map(|p| match &p.placement {
            Placement::PromotedOrphan { missing_parent } => {
                Some((p.id.as_str(), missing_parent.as_str()))
            }
            _ => None,
        })
    }

    /// True when the content set produced no orphans and no duplicates.
    pub fn is_clean(&self) -> bool {
        self.duplicates.is_empty() && self.orphans().next().is_none()
    }
}

/// JSON shape of a build, written by the CLI.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<'a> {
    pub chapters: &'a [Node],
    /// Node ids in reading order.
    pub reading_order: Vec<&'a str>,
    pub report: &'a BuildReport,
}

impl<'a> Manifest<'a> {
    pub fn new(navigation: &'a Navigation, report: &'a BuildReport) -> Self {
        Self {
            chapters: &navigation.chapters,
            reading_order: navigation
                .flat_list()
                .into_iter()
                .map(|n| n.id.as_str())
                .collect(),
            report,
        }
    }
}

impl Navigation {
    /// All nodes in reading order.
    pub fn flat_list(&self) -> Vec<&Node> {
        flatten_tree(&self.chapters)
    }

    /// Look up a node by its full id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.flat_list().into_iter().find(|n| n.id == id)
    }

    /// Prev/current/next for a node id.
    pub fn reading_order(&self, id: &str) -> Option<ReadingOrder<'_>> {
        get_reading_order(&self.flat_list(), id)
    }

    /// Distinct volumes, in reading order.
    pub fn volumes(&self) -> Vec<&str> {
        let mut volumes: Vec<&str> = Vec::new();
        for node in &self.chapters {
            if volumes.last() != Some(&node.volume.as_str()) {
                volumes.push(&node.volume);
            }
        }
        volumes
    }

    /// Total number of nodes, at every depth.
    pub fn len(&self) -> usize {
        self.flat_list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }
}

/// Build the navigation from the full, unfiltered entry list.
pub fn build_navigation(entries: impl IntoIterator<Item = Entry>) -> Navigation {
    build_navigation_with_report(entries).0
}

/// Same as [`build_navigation`], also returning what happened to each entry.
pub fn build_navigation_with_report(
    entries: impl IntoIterator<Item = Entry>,
) -> (Navigation, BuildReport) {
    let (drafts, mut published): (Vec<Entry>, Vec<Entry>) =
        entries.into_iter().partition(|e| e.data.draft);
    published.sort_by(|a, b| a.id.cmp(&b.id));

    let nodes: Vec<Node> = published.into_iter().map(raw_node).collect();
    let assembly = assemble(nodes);

    let navigation = Navigation {
        chapters: assembly.roots,
    };
    debug!(
        roots = navigation.chapters.len(),
        nodes = assembly.placements.len(),
        drafts = drafts.len(),
        "navigation built"
    );

    let report = BuildReport {
        drafts: drafts.into_iter().map(|e| e.id).collect(),
        placements: assembly.placements,
        duplicates: assembly.duplicates,
    };
    (navigation, report)
}

/// Assemble nodes into a forest. Input order does not matter.
pub fn build_tree(nodes: Vec<Node>) -> Vec<Node> {
    assemble(nodes).roots
}

/// Pre-order depth-first walk: a node, then each of its children in order.
pub fn flatten_tree(roots: &[Node]) -> Vec<&Node> {
    let mut out = Vec::new();
    push_preorder(roots, &mut out);
    out
}

fn push_preorder<'a>(nodes: &'a [Node], out: &mut Vec<&'a Node>) {
    for node in nodes {
        out.push(node);
        push_preorder(&node.children, out);
    }
}

/// Locate `id` in a flat list and return it with its neighbours.
///
/// Linear scan; returns `None` when the id is not in the list.
pub fn get_reading_order<'a>(flat_list: &[&'a Node], id: &str) -> Option<ReadingOrder<'a>> {
    let index = flat_list.iter().position(|n| n.id == id)?;
    Some(ReadingOrder {
        prev: index
            .checked_sub(1)
            .and_then(|i| flat_list.get(i))
            .copied(),
        current: flat_list[index],
        next: flat_list.get(index + 1).copied(),
    })
}

/// Decode an entry into a childless node.
fn raw_node(entry: Entry) -> Node {
    let parsed = parse_id(&entry.id);
    let volume = parsed.volume.to_string();
    let section_id = parsed.section_id.to_string();
    let depth = parsed.depth();
    let url = naming::id_to_url(&entry.id);

    Node {
        title: entry.data.title.clone(),
        breadcrumb: entry.data.breadcrumb.clone(),
        is_chapter: entry.data.is_chapter,
        id: entry.id,
        section_id,
        volume,
        depth,
        url,
        data: entry.data,
        children: Vec::new(),
        has_children: false,
    }
}

struct Assembly {
    roots: Vec<Node>,
    placements: Vec<PlacedNode>,
    duplicates: Vec<String>,
}

fn assemble(mut nodes: Vec<Node>) -> Assembly {
    nodes.sort_by(|a, b| {
        (a.volume.as_str(), a.section_id.as_str()).cmp(&(b.volume.as_str(), b.section_id.as_str()))
    });

    // Pass 1: link children to parents by index.
    let mut lookup: HashMap<(&str, &str), usize> = HashMap::with_capacity(nodes.len());
    let mut duplicates = Vec::new();
    for (idx, node) in nodes.iter().enumerate() {
        let key = (node.volume.as_str(), node.section_id.as_str());
        if lookup.insert(key, idx).is_some() {
            warn!(id = %node.id, "duplicate section id; later entry wins the parent lookup");
            duplicates.push(node.id.clone());
        }
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    let mut root_indices = Vec::new();
    let mut placements = Vec::with_capacity(nodes.len());

    for (idx, node) in nodes.iter().enumerate() {
        let placement = match naming::parent_section_id(&node.section_id) {
            None => {
                root_indices.push(idx);
                Placement::Root
            }
            Some(parent) => match lookup.get(&(node.volume.as_str(), parent)) {
                Some(&parent_idx) => {
                    children[parent_idx].push(idx);
                    Placement::Attached {
                        parent: nodes[parent_idx].id.clone(),
                    }
                }
                None => {
                    let missing_parent = format!("{}/{}", node.volume, parent);
                    warn!(id = %node.id, %missing_parent, "parent missing; promoting to root");
                    root_indices.push(idx);
                    Placement::PromotedOrphan { missing_parent }
                }
            },
        };
        placements.push(PlacedNode {
            id: node.id.clone(),
            placement,
        });
    }

    drop(lookup);

    // Pass 2: move nodes into their owners, then derive flags.
    let mut slots: Vec<Option<Node>> = nodes.into_iter().map(Some).collect();
    let mut roots: Vec<Node> = root_indices
        .into_iter()
        .filter_map(|idx| materialize(idx, &mut slots, &children))
        .collect();
    derive_has_children(&mut roots);

    Assembly {
        roots,
        placements,
        duplicates,
    }
}

/// Every index is claimed exactly once: parents sort strictly before their
/// children, so the links form a forest.
fn materialize(idx: usize, slots: &mut [Option<Node>], children: &[Vec<usize>]) -> Option<Node> {
    let mut node = slots.get_mut(idx)?.take()?;
    node.children = children[idx]
        .iter()
        .filter_map(|&child| materialize(child, slots, children))
        .collect();
    Some(node)
}

fn derive_has_children(nodes: &mut [Node]) {
    for node in nodes {
        node.has_children = !node.children.is_empty();
        derive_has_children(&mut node.children);
    }
}
