//! Crawler coordinator - main crawl orchestration logic
//!
//! Each URL resolution runs as its own task. A page that is fetched for the
//! first time fans out one child task per extracted link into a `JoinSet`
//! and fans their results back in, in document order, before its links are
//! written. The pieces shared across all tasks of one crawl are:
//! - the site root every href is resolved against
//! - the page registry (dedup table and memoization cache)
//! - the fetch limiter capping in-flight requests crawl-wide
//! - a cancellation token tripped by the first fatal error

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::limiter::FetchLimiter;
use crate::crawler::parser::{decode_body, extract_links, ExtractedLink};
use crate::crawler::registry::PageRegistry;
use crate::graph::{PageId, SiteGraph};
use crate::output::StatsRecorder;
use crate::url::{resolve, Resolution, ResolvedUrl, SiteRoot};
use crate::{CrawlError, UrlError};
use chrono::Utc;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Description given to the seed page
pub const SITE_ROOT_DESCRIPTION: &str = "site root";

/// Main crawler coordinator structure
///
/// A coordinator can run several crawls; each run gets its own registry,
/// limiter and child cancellation token. Cancelling the coordinator's token
/// stops every run in progress.
pub struct Coordinator {
    fetcher: Arc<dyn Fetcher>,
    max_concurrent_fetches: usize,
    cancel: CancellationToken,
}

/// State shared by every task of one crawl
struct CrawlContext {
    root: SiteRoot,
    fetcher: Arc<dyn Fetcher>,
    registry: PageRegistry,
    limiter: FetchLimiter,
    cancel: CancellationToken,
    stats: StatsRecorder,
}

/// What a successful fetch leaves to do
enum Fetched {
    /// HTML page: resolve these links against `base`
    Links { base: Url, links: Vec<ExtractedLink> },
    /// Error status, off-site redirect or non-HTML content: no links to follow
    Terminal,
}

impl Coordinator {
    /// Creates a coordinator around any fetcher
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of page content
    /// * `max_concurrent_fetches` - Crawl-wide cap on in-flight fetches
    pub fn new(fetcher: Arc<dyn Fetcher>, max_concurrent_fetches: usize) -> Self {
        Self {
            fetcher,
            max_concurrent_fetches,
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a coordinator with an HTTP fetcher built from configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlError::HttpClient)` - The HTTP client could not be built
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self::new(
            Arc::new(fetcher),
            config.crawler.max_concurrent_fetches,
        ))
    }

    /// Token that cancels every crawl run by this coordinator
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancels every crawl in progress
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Crawls the site rooted at `seed`
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute http(s) URL; its origin becomes the site root
    ///
    /// # Returns
    ///
    /// * `Ok(SiteGraph)` - Every reachable same-site page, fully linked
    /// * `Err(CrawlError)` - The first fatal error observed; no partial graph
    pub async fn run(&self, seed: &str) -> Result<SiteGraph, CrawlError> {
        let root = SiteRoot::from_seed(seed)?;
        let root_url = root.url().clone();

        let context = Arc::new(CrawlContext {
            root,
            fetcher: self.fetcher.clone(),
            registry: PageRegistry::new(),
            limiter: FetchLimiter::new(self.max_concurrent_fetches),
            cancel: self.cancel.child_token(),
            stats: StatsRecorder::default(),
        });

        tracing::info!(
            "Starting crawl of {} with at most {} concurrent fetches",
            seed,
            context.limiter.capacity()
        );
        let started_at = Utc::now();
        let start = Instant::now();

        let result = visit(
            context.clone(),
            root_url,
            seed.trim().to_string(),
            SITE_ROOT_DESCRIPTION.to_string(),
        )
        .await;

        let root_id = match result {
            Ok(Some(id)) => id,
            Ok(None) => {
                return Err(UrlError::RootUndetermined {
                    url: seed.to_string(),
                }
                .into())
            }
            Err(e) => {
                context.cancel.cancel();
                return Err(e);
            }
        };

        let stats = context
            .stats
            .snapshot(context.registry.len(), started_at, start.elapsed());
        let graph = context.registry.into_graph(root_id, stats);

        tracing::info!(
            "Crawl completed: {} pages, {} fetches in {:?}",
            graph.len(),
            graph.stats().fetches,
            graph.stats().elapsed
        );

        Ok(graph)
    }
}

impl CrawlContext {
    /// Fetches a newly registered page and extracts its links
    ///
    /// The limiter permit is held only for the HTTP exchange. Waiting for a
    /// permit stops as soon as the crawl is cancelled.
    async fn fetch_page(&self, id: PageId, target: &ResolvedUrl) -> Result<Fetched, CrawlError> {
        let response = {
            let _permit = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return Err(CrawlError::Cancelled),
                permit = self.limiter.acquire() => permit?,
            };

            tracing::debug!("Crawling {} ...", target.url);
            self.stats.record_fetch();

            self.fetcher
                .fetch(&target.url)
                .await
                .map_err(|source| CrawlError::Fetch {
                    url: target.url.to_string(),
                    source,
                })?
        };

        self.registry
            .record_status(id, response.status, response.is_success());

        if !response.is_success() {
            tracing::debug!("Server returned {} for {}", response.status, target.url);
            self.stats.record_failed_status();
            return Ok(Fetched::Terminal);
        }

        // Whatever another host serves is not part of this site
        if !self.root.contains(&response.final_url) {
            tracing::debug!(
                "Not extracting links from {}: redirected off-site to {}",
                target.url,
                response.final_url
            );
            self.stats.record_off_site();
            return Ok(Fetched::Terminal);
        }

        if !response.is_html() {
            tracing::debug!(
                "Not extracting links from {} ({})",
                target.url,
                response.content_type.as_deref().unwrap_or_default()
            );
            self.stats.record_non_html();
            return Ok(Fetched::Terminal);
        }

        let html = decode_body(&response.body).map_err(|message| CrawlError::HtmlParse {
            url: target.url.to_string(),
            message,
        })?;
        let links = extract_links(html);
        tracing::trace!("Found {} links on {}", links.len(), target.url);

        // Relative links on a redirected page resolve against where it landed
        Ok(Fetched::Links {
            base: response.final_url,
            links,
        })
    }
}

/// Resolves one href and, if it names a page not seen before, crawls it
///
/// # Returns
///
/// * `Ok(Some(id))` - The page for this href (new or already registered)
/// * `Ok(None)` - Unsupported scheme or off-site link
/// * `Err(CrawlError)` - Fatal error in this page or any descendant
fn visit(
    context: Arc<CrawlContext>,
    base: Url,
    href: String,
    description: String,
) -> BoxFuture<'static, Result<Option<PageId>, CrawlError>> {
    async move {
        if context.cancel.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        let target = match resolve(&base, &href, &context.root)? {
            Resolution::Page(target) => target,
            Resolution::Skipped { scheme } => {
                tracing::debug!("Unsupported scheme {} at {}", scheme, href);
                context.stats.record_skipped();
                return Ok(None);
            }
            Resolution::OffSite { url } => {
                tracing::debug!("Ignoring off-site link {}", url);
                context.stats.record_off_site();
                return Ok(None);
            }
        };

        let (id, existed) = context
            .registry
            .resolve_or_create(&target.key, &description);
        if existed {
            tracing::trace!("Already registered {}", target.key);
            context.stats.record_dedup_hit();
            return Ok(Some(id));
        }

        let links = match context.fetch_page(id, &target).await? {
            Fetched::Links { base, links } => fan_out(&context, base, links).await?,
            Fetched::Terminal => Vec::new(),
        };

        context.registry.finalize(id, links);
        Ok(Some(id))
    }
    .boxed()
}

/// Crawls every link of a page concurrently and collects the results
///
/// Results are placed by extraction index, so the returned ids follow
/// document order regardless of completion order. The first fatal error
/// cancels the crawl, aborts the remaining siblings and is returned; a
/// sibling that merely observed the cancellation does not mask it.
async fn fan_out(
    context: &Arc<CrawlContext>,
    base: Url,
    links: Vec<ExtractedLink>,
) -> Result<Vec<PageId>, CrawlError> {
    if context.cancel.is_cancelled() {
        return Err(CrawlError::Cancelled);
    }

    let mut slots: Vec<Option<PageId>> = vec![None; links.len()];
    let mut tasks = JoinSet::new();

    for (index, link) in links.into_iter().enumerate() {
        let child = visit(context.clone(), base.clone(), link.href, link.text);
        tasks.spawn(async move { (index, child.await) });
    }

    let mut cancelled = false;
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = match joined {
            Ok(outcome) => outcome,
            Err(e) => {
                context.cancel.cancel();
                tasks.abort_all();
                return Err(CrawlError::Task(e));
            }
        };

        match result {
            Ok(page) => slots[index] = page,
            Err(CrawlError::Cancelled) => cancelled = true,
            Err(error) => {
                context.cancel.cancel();
                tasks.abort_all();
                return Err(error);
            }
        }
    }

    if cancelled {
        return Err(CrawlError::Cancelled);
    }

    Ok(slots.into_iter().flatten().collect())
}
