//! HTML fragments built from the navigation: table of contents, breadcrumb,
//! and the prev/next pager.
//!
//! Uses [maud](https://maud.lambda.xyz/) so every title is escaped at
//! interpolation. The fragments carry no styling; page templates place them.
//!
//! ```text
//! <nav class="toc">
//!   <ol>
//!     <li class="chapter"><a href="/01/00/">Prologue</a></li>
//!     <li class="chapter current"><a href="/01/01/" aria-current="page">The River</a>
//!       <ol>
//!         <li><a href="/01/01/00/">Crossing</a></li>
//!       </ol>
//!     </li>
//!   </ol>
//! </nav>
//! ```

use crate::config::SiteMeta;
use crate::types::{Node, ReadingOrder};
use maud::{DOCTYPE, Markup, html};

/// Renders the base HTML document structure
fn base_document(title: &str, lang: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(lang) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the table of contents as nested ordered lists.
///
/// `max_depth` counts tree levels, not id depth: `Some(1)` shows only the
/// roots. A promoted orphan is a root and renders at level 1.
pub fn render_toc(chapters: &[Node], current_id: Option<&str>, max_depth: Option<usize>) -> Markup {
    html! {
        nav.toc aria-label="Table of contents" {
            (render_level(chapters, current_id, max_depth, 1))
        }
    }
}

fn render_level(
    nodes: &[Node],
    current_id: Option<&str>,
    max_depth: Option<usize>,
    level: usize,
) -> Markup {
    html! {
        ol {
            @for node in nodes {
                @let is_current = current_id == Some(node.id.as_str());
                li class=[node_class(node, is_current)] {
                    a href=(node.url) aria-current=[is_current.then_some("page")] { (node.title) }
                    @if node.has_children && max_depth.is_none_or(|max| level < max) {
                        (render_level(&node.children, current_id, max_depth, level + 1))
                    }
                }
            }
        }
    }
}

fn node_class(node: &Node, is_current: bool) -> Option<&'static str> {
    match (node.is_chapter, is_current) {
        (true, true) => Some("chapter current"),
        (true, false) => Some("chapter"),
        (false, true) => Some("current"),
        (false, false) => None,
    }
}

/// Renders the breadcrumb trail from the node's frontmatter, ending in its title.
pub fn render_breadcrumb(node: &Node) -> Markup {
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            ol {
                @for label in &node.breadcrumb {
                    li { (label) }
                }
                li aria-current="page" { (node.title) }
            }
        }
    }
}

/// Renders prev/next links. A missing side renders nothing.
pub fn render_pager(order: &ReadingOrder<'_>) -> Markup {
    html! {
        nav.pager aria-label="Reading order" {
            @if let Some(prev) = order.prev {
                a.prev rel="prev" href=(prev.url) {
                    span.pager-label { "Previous" }
                    span.pager-title { (prev.title) }
                }
            }
            @if let Some(next) = order.next {
                a.next rel="next" href=(next.url) {
                    span.pager-label { "Next" }
                    span.pager-title { (next.title) }
                }
            }
        }
    }
}

/// Standalone contents page for the whole work.
pub fn render_toc_page(
    site: &SiteMeta,
    chapters: &[Node],
    current_id: Option<&str>,
    max_depth: Option<usize>,
) -> Markup {
    let content = html! {
        header.site-header {
            h1 { (site.title) }
        }
        main.contents-page {
            (render_toc(chapters, current_id, max_depth))
        }
    };
    base_document(&site.title, &site.lang, content)
}
