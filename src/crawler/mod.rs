//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the [`Fetcher`] trait
//! - HTML link extraction
//! - The page registry that deduplicates URLs
//! - The crawl-wide fetch limiter
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod limiter;
mod parser;
mod registry;

pub use coordinator::{Coordinator, SITE_ROOT_DESCRIPTION};
pub use fetcher::{
    build_http_client, is_html_content_type, FetchResponse, Fetcher, HttpFetcher,
};
pub use limiter::{FetchLimiter, FetchPermit};
pub use parser::{decode_body, extract_links, ExtractedLink};
pub use registry::PageRegistry;

use crate::config::Config;
use crate::graph::SiteGraph;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Determine the site root from the seed
/// 2. Build the HTTP client
/// 3. Fetch the seed and every same-site page reachable from it
/// 4. Return the linked page graph with crawl statistics
///
/// # Arguments
///
/// * `seed` - Absolute http(s) URL of the first page
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(SiteGraph)` - Crawl completed successfully
/// * `Err(CrawlError)` - Crawl failed; no partial result is returned
///
/// # Example
///
/// ```no_run
/// use sitegraph::config::Config;
/// use sitegraph::crawler::crawl;
///
/// # async fn example() -> Result<(), sitegraph::CrawlError> {
/// let graph = crawl("https://example.com/", &Config::default()).await?;
/// println!("{} pages", graph.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed: &str, config: &Config) -> Result<SiteGraph, CrawlError> {
    let coordinator = Coordinator::from_config(config)?;
    coordinator.run(seed).await
}
