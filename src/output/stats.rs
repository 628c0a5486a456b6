//! Crawl statistics
//!
//! Counters are recorded lock-free while the crawl runs and snapshotted into
//! a [`CrawlStats`] attached to the resulting graph.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Distinct pages in the graph
    pub pages: usize,

    /// HTTP requests issued
    pub fetches: usize,

    /// Pages that answered with a non-2xx status
    pub failed_statuses: usize,

    /// Pages whose Content-Type was not HTML
    pub non_html: usize,

    /// Links skipped for an unsupported scheme
    pub skipped_links: usize,

    /// Links pointing at another host
    pub off_site_links: usize,

    /// Link resolutions answered by an existing page
    pub dedup_hits: usize,

    /// When the crawl started
    pub started_at: Option<DateTime<Utc>>,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,
}

/// Thread-safe counters updated by crawl tasks
#[derive(Debug, Default)]
pub struct StatsRecorder {
    fetches: AtomicUsize,
    failed_statuses: AtomicUsize,
    non_html: AtomicUsize,
    skipped_links: AtomicUsize,
    off_site_links: AtomicUsize,
    dedup_hits: AtomicUsize,
}

impl StatsRecorder {
    pub fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed_status(&self) {
        self.failed_statuses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_non_html(&self) {
        self.non_html.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.skipped_links.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_off_site(&self) {
        self.off_site_links.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dedup_hit(&self) {
        self.dedup_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a snapshot of the counters
    pub fn snapshot(
        &self,
        pages: usize,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> CrawlStats {
        CrawlStats {
            pages,
            fetches: self.fetches.load(Ordering::Relaxed),
            failed_statuses: self.failed_statuses.load(Ordering::Relaxed),
            non_html: self.non_html.load(Ordering::Relaxed),
            skipped_links: self.skipped_links.load(Ordering::Relaxed),
            off_site_links: self.off_site_links.load(Ordering::Relaxed),
            dedup_hits: self.dedup_hits.load(Ordering::Relaxed),
            started_at: Some(started_at),
            elapsed,
        }
    }
}

/// Formats statistics as human-readable text
pub fn format_statistics(stats: &CrawlStats) -> String {
    let mut out = String::new();

    out.push_str("=== Crawl Statistics ===\n\n");
    if let Some(started_at) = stats.started_at {
        out.push_str(&format!("  Started: {}\n", started_at.to_rfc3339()));
    }
    out.push_str(&format!("  Duration: {:.2}s\n", stats.elapsed.as_secs_f64()));
    out.push_str(&format!("  Pages: {}\n", stats.pages));
    out.push_str(&format!("  Fetches: {}\n", stats.fetches));
    out.push_str(&format!("  Failed statuses: {}\n", stats.failed_statuses));
    out.push_str(&format!("  Non-HTML pages: {}\n", stats.non_html));
    out.push_str(&format!("  Skipped links: {}\n", stats.skipped_links));
    out.push_str(&format!("  Off-site links: {}\n", stats.off_site_links));
    out.push_str(&format!("  Already-seen links: {}\n", stats.dedup_hits));

    let rate = if stats.elapsed.as_secs_f64() > 0.0 {
        stats.fetches as f64 / stats.elapsed.as_secs_f64()
    } else {
        0.0
    };
    out.push_str(&format!("  Rate: {:.2} fetches/sec\n", rate));

    out
}
