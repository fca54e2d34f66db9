use super::ListPage;
use crate::table::PageWindow;
use lru::LruCache;
use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_PAGES: usize = 32;

/// Recently fetched pages of one resource, keyed by window.
///
/// A mutation drops exactly the entry for the window it happened on;
/// other pages stay until they are evicted or refetched.
pub struct PageCache<R> {
    pages: LruCache<PageWindow, ListPage<R>>,
}

impl<R: Clone> PageCache<R> {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            pages: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, window: &PageWindow) -> Option<ListPage<R>> {
        self.pages.get(window).cloned()
    }

    pub fn put(&mut self, window: PageWindow, page: ListPage<R>) {
        self.pages.put(window, page);
    }

    /// Returns whether an entry was removed.
    pub fn invalidate(&mut self, window: &PageWindow) -> bool {
        self.pages.pop(window).is_some()
    }

    pub fn contains(&self, window: &PageWindow) -> bool {
        self.pages.contains(window)
    }

    pub fn clear(&mut self) {
        self.pages.clear();
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<R: Clone> Default for PageCache<R> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_PAGES)
    }
}
