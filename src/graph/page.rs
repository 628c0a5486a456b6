//! Page node definitions for the crawl graph
//!
//! A page is created the moment its URL is first registered, before it is
//! fetched, and its outgoing links are written exactly once afterwards.

use std::fmt;

/// Handle to a page in the crawl arena
///
/// Two equal ids always refer to the same node; this is the identity the
/// dedup invariant is stated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(usize);

impl PageId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the page in its arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the crawl graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    id: PageId,
    uri: String,
    description: String,
    status: Option<u16>,
    links: Option<Vec<PageId>>,
}

impl Page {
    pub(crate) fn new(id: PageId, uri: String, description: String) -> Self {
        Self {
            id,
            uri,
            description,
            status: None,
            links: None,
        }
    }

    /// The page's handle
    pub fn id(&self) -> PageId {
        self.id
    }

    /// Canonical host-relative path of the page
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Display label: anchor text, or the href, plus ` (status)` on failure
    pub fn description(&self) -> &str {
        &self.description
    }

    /// HTTP status observed when the page was fetched
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Returns true if the page answered with a non-2xx status
    pub fn is_failure(&self) -> bool {
        self.status.is_some_and(|s| !(200..300).contains(&s))
    }

    /// Outgoing links in document order
    ///
    /// Empty until the page is finalized.
    pub fn links(&self) -> &[PageId] {
        self.links.as_deref().unwrap_or(&[])
    }

    /// Returns true once the page's links have been written
    pub fn is_complete(&self) -> bool {
        self.links.is_some()
    }

    pub(crate) fn record_status(&mut self, status: u16, success: bool) {
        self.status = Some(status);
        if !success {
            self.description = format!("{} ({})", self.description, status);
        }
    }

    /// Writes the outgoing links; returns false if they were already written
    pub(crate) fn finalize(&mut self, links: Vec<PageId>) -> bool {
        if self.links.is_some() {
            return false;
        }
        self.links = Some(links);
        true
    }
}
