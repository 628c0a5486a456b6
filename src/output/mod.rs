//! Output module for rendering crawl results
//!
//! This module handles:
//! - Rendering the page graph as an indented tree or a markdown site map
//! - Recording and printing crawl statistics

mod markdown;
pub mod stats;
mod tree;

pub use markdown::render_markdown;
pub use stats::{format_statistics, CrawlStats, StatsRecorder};
pub use tree::{render_tree, walk, WalkEntry, INDENT_WIDTH};

use crate::config::OutputFormat;
use crate::graph::SiteGraph;

/// Renders a graph in the requested format
pub fn render(graph: &SiteGraph, format: OutputFormat, show_summary: bool) -> String {
    match format {
        OutputFormat::Tree => {
            let mut out = render_tree(graph);
            if show_summary {
                out.push('\n');
                out.push_str(&format_statistics(graph.stats()));
            }
            out
        }
        OutputFormat::Markdown => render_markdown(graph, show_summary),
    }
}
