//! Page registry: the crawl's dedup table and memoization cache
//!
//! Every page node is created here and owned by the registry's arena for the
//! duration of the crawl. The check-and-insert in [`PageRegistry::resolve_or_create`]
//! happens before any network I/O for a key, so concurrent discoveries of the
//! same URL (including self links and links back to an ancestor still being
//! fetched) all observe one node and only the first proceeds to fetch it.

use crate::graph::{Page, PageId, SiteGraph};
use crate::output::CrawlStats;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Arena {
    index: HashMap<String, PageId>,
    pages: Vec<Page>,
}

/// Concurrency-safe arena mapping canonical keys to page nodes
///
/// A single mutex guards the arena; critical sections are O(1) map and
/// vector operations and never span a network call.
#[derive(Debug, Default)]
pub struct PageRegistry {
    arena: Mutex<Arena>,
}

impl PageRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Arena> {
        // Every mutation leaves the arena consistent, so a poisoned lock is still usable
        self.arena.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the node for `key`, creating it if this is the first sighting
    ///
    /// # Arguments
    ///
    /// * `key` - Canonical host-relative key
    /// * `description` - Label used only if the node is created now
    ///
    /// # Returns
    ///
    /// `(id, already_existed)`. The caller that receives `false` owns the
    /// fetch for this page; callers receiving `true` must not fetch it.
    pub fn resolve_or_create(&self, key: &str, description: &str) -> (PageId, bool) {
        let mut arena = self.lock();

        if let Some(id) = arena.index.get(key) {
            return (*id, true);
        }

        let id = PageId::new(arena.pages.len());
        arena
            .pages
            .push(Page::new(id, key.to_string(), description.to_string()));
        arena.index.insert(key.to_string(), id);

        (id, false)
    }

    /// Records the HTTP status observed for a page
    ///
    /// A failing status is appended to the page's description.
    pub fn record_status(&self, id: PageId, status: u16, success: bool) {
        let mut arena = self.lock();
        if let Some(page) = arena.pages.get_mut(id.index()) {
            page.record_status(status, success);
        }
    }

    /// Writes a page's outgoing links
    ///
    /// Links are written exactly once; a second write is ignored.
    pub fn finalize(&self, id: PageId, links: Vec<PageId>) {
        let mut arena = self.lock();
        match arena.pages.get_mut(id.index()) {
            Some(page) => {
                if !page.finalize(links) {
                    tracing::warn!("Links for {} were already written, ignoring", page.uri());
                }
            }
            None => tracing::warn!("Finalize for unknown page {}", id),
        }
    }

    /// Returns a snapshot of a page
    pub fn get(&self, id: PageId) -> Option<Page> {
        self.lock().pages.get(id.index()).cloned()
    }

    /// Number of registered pages
    pub fn len(&self) -> usize {
        self.lock().pages.len()
    }

    /// Returns true if no page has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains the arena into an immutable graph rooted at `root`
    pub fn into_graph(&self, root: PageId, stats: CrawlStats) -> SiteGraph {
        let arena = std::mem::take(&mut *self.lock());
        SiteGraph::new(arena.pages, arena.index, root, stats)
    }
}
