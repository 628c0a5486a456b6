//! Indented tree rendering of a crawl graph
//!
//! The graph may contain cycles, so a page is expanded only the first time
//! it is reached; later occurrences are marked `(showed)`.

use crate::graph::{Page, SiteGraph};
use std::collections::HashSet;

/// Spaces added per nesting level
pub const INDENT_WIDTH: usize = 2;

/// One line of a depth-first walk over the graph
#[derive(Debug, Clone, Copy)]
pub struct WalkEntry<'a> {
    /// Nesting level, 0 for the root
    pub depth: usize,

    /// The page reached
    pub page: &'a Page,

    /// True if the page was already reached earlier in the walk
    pub revisit: bool,
}

/// Walks the graph depth-first from the root, in link order
///
/// Each page is expanded once. Repeated links within one page's list are
/// visited once. Uses an explicit stack, so depth is not limited by the
/// call stack.
pub fn walk(graph: &SiteGraph) -> Vec<WalkEntry<'_>> {
    let mut entries = Vec::new();
    let mut shown = HashSet::new();
    let mut stack = vec![(graph.root_id(), 0usize)];

    while let Some((id, depth)) = stack.pop() {
        let page = graph.page(id);

        if !shown.insert(id) {
            entries.push(WalkEntry {
                depth,
                page,
                revisit: true,
            });
            continue;
        }

        entries.push(WalkEntry {
            depth,
            page,
            revisit: false,
        });

        let mut unique = HashSet::new();
        let children: Vec<_> = page
            .links()
            .iter()
            .filter(|child| unique.insert(**child))
            .collect();

        // Reversed so the first link is popped first
        for child in children.into_iter().rev() {
            stack.push((*child, depth + 1));
        }
    }

    entries
}

/// Renders the graph as an indented tree
///
/// # Format
///
/// ```text
/// / "site root"
///   (showed) / "site root"
///   /about "about"
///     (showed) / "site root"
///     /career "career"
///   /products "products (404)"
/// ```
pub fn render_tree(graph: &SiteGraph) -> String {
    let mut out = String::new();

    for entry in walk(graph) {
        out.push_str(&" ".repeat(entry.depth * INDENT_WIDTH));
        if entry.revisit {
            out.push_str("(showed) ");
        }
        out.push_str(&format!(
            "{} \"{}\"\n",
            entry.page.uri(),
            entry.page.description()
        ));
    }

    out
}
