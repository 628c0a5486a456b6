//! Markdown site map generation
//!
//! This module renders a crawl graph as a nested markdown list of links,
//! optionally followed by the crawl statistics.

use crate::graph::SiteGraph;
use crate::output::tree::{walk, INDENT_WIDTH};

/// Escapes characters that would end a markdown link label early
fn escape_label(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Formats a crawl graph as markdown
///
/// Every page becomes a list item `[description](uri)`, nested under the
/// page that linked to it. Pages already listed are marked `(showed)` and
/// not expanded again.
///
/// # Arguments
///
/// * `graph` - The crawl result
/// * `include_stats` - Append a statistics table
///
/// # Returns
///
/// A formatted markdown string
pub fn render_markdown(graph: &SiteGraph, include_stats: bool) -> String {
    let mut md = String::new();

    md.push_str("# Site Map\n\n");

    for entry in walk(graph) {
        md.push_str(&" ".repeat(entry.depth * INDENT_WIDTH));
        md.push_str("- ");
        if entry.revisit {
            md.push_str("(showed) ");
        }
        md.push_str(&format!(
            "[{}]({})\n",
            escape_label(entry.page.description()),
            entry.page.uri()
        ));
    }

    if include_stats {
        let stats = graph.stats();

        md.push_str("\n## Statistics\n\n");
        md.push_str("| Metric | Count |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Pages | {} |\n", stats.pages));
        md.push_str(&format!("| Links | {} |\n", graph.link_count()));
        md.push_str(&format!("| Fetches | {} |\n", stats.fetches));
        md.push_str(&format!("| Failed statuses | {} |\n", stats.failed_statuses));
        md.push_str(&format!("| Non-HTML pages | {} |\n", stats.non_html));
        md.push_str(&format!("| Skipped links | {} |\n", stats.skipped_links));
        md.push_str(&format!("| Off-site links | {} |\n", stats.off_site_links));
        md.push_str(&format!(
            "\n_Crawled in {:.2} seconds._\n",
            stats.elapsed.as_secs_f64()
        ));
    }

    md
}
