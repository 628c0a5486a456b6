//! sitegraph: a concurrent single-site crawler
//!
//! This crate crawls one website from a seed URL, follows same-host links and
//! produces a graph of visited pages annotated with their link text. Every
//! distinct page is fetched at most once, cycles are represented as
//! back-references, and total in-flight fetches are capped crawl-wide.

pub mod config;
pub mod crawler;
pub mod graph;
pub mod output;
pub mod url;

use thiserror::Error;

/// Boxed error produced by a [`crawler::Fetcher`] implementation
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for crawl operations
///
/// Every variant is fatal: it aborts the crawl and cancels outstanding work.
/// Non-2xx responses and skipped links are not errors; they are recorded in
/// the resulting graph instead.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Url(#[from] UrlError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("HTML parse error for {url}: {message}")]
    HtmlParse { url: String, message: String },

    #[error("Crawl cancelled")]
    Cancelled,

    #[error("Crawl task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Invalid URL '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: ::url::ParseError,
    },

    #[error("Unable to determine site root from '{url}'")]
    RootUndetermined { url: String },

    #[error("Unsupported scheme '{scheme}' in seed URL '{url}'")]
    UnsupportedScheme { url: String, scheme: String },
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator};
pub use graph::{Page, PageId, SiteGraph};
pub use crate::url::{Resolution, SiteRoot};
