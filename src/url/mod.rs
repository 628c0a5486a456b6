//! URL handling module for sitegraph
//!
//! This module turns raw hrefs into crawl decisions: resolution against the
//! current page, confinement to the site root, and the canonical
//! host-relative key used for deduplication.

mod normalize;
mod root;

use url::Url;

// Re-export main functions
pub use normalize::{canonical_key, resolve};
pub use root::SiteRoot;

/// Outcome of resolving one href
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Same-site http(s) page that may be crawled
    Page(ResolvedUrl),
    /// Unsupported scheme such as `mailto:` or `javascript:`
    Skipped { scheme: String },
    /// Link to a different host; never fetched or recorded
    OffSite { url: Url },
}

/// A same-site URL together with its dedup key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// Canonical host-relative key (path plus query)
    pub key: String,
    /// Absolute URL to fetch, without fragment
    pub url: Url,
}

/// Returns true for the schemes the crawler fetches
pub fn is_crawlable_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https")
}
