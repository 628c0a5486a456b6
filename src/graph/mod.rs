//! The crawl result graph
//!
//! Pages live in an arena and refer to each other by [`PageId`]. The graph is
//! directed and may contain cycles: a page can link to itself or back to an
//! ancestor, in which case the link is the ancestor's id rather than a copy.

mod page;

pub use page::{Page, PageId};

use crate::output::CrawlStats;
use std::collections::HashMap;

/// Immutable page graph produced by a successful crawl
#[derive(Debug, Clone)]
pub struct SiteGraph {
    pages: Vec<Page>,
    index: HashMap<String, PageId>,
    root: PageId,
    stats: CrawlStats,
}

impl SiteGraph {
    pub(crate) fn new(
        pages: Vec<Page>,
        index: HashMap<String, PageId>,
        root: PageId,
        stats: CrawlStats,
    ) -> Self {
        Self {
            pages,
            index,
            root,
            stats,
        }
    }

    /// The seed page
    pub fn root(&self) -> &Page {
        self.page(self.root)
    }

    /// Id of the seed page
    pub fn root_id(&self) -> PageId {
        self.root
    }

    /// Looks up a page by id
    ///
    /// # Panics
    ///
    /// Panics if the id does not belong to this graph.
    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.index()]
    }

    /// Looks up a page by id, returning None for foreign ids
    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.get(id.index())
    }

    /// Looks up a page by its canonical key
    pub fn find(&self, uri: &str) -> Option<&Page> {
        self.index.get(uri).map(|id| self.page(*id))
    }

    /// Iterates over a page's outgoing links, in document order
    pub fn links<'a>(&'a self, page: &'a Page) -> impl Iterator<Item = &'a Page> + 'a {
        page.links().iter().map(move |id| self.page(*id))
    }

    /// All pages, in registration order
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Number of distinct pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if the graph has no pages
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of link entries across all pages
    pub fn link_count(&self) -> usize {
        self.pages.iter().map(|p| p.links().len()).sum()
    }

    /// Statistics gathered while crawling
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }
}
