use super::cache::PageCache;
use super::{ListPage, ListSource};
use crate::core::{Record, Result};
use crate::table::PageWindow;
use log::{debug, warn};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where a list is in its fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<R> {
    Idle,
    Loading,
    Loaded(ListPage<R>),
    Error(String),
}

impl<R> LoadState<R> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn page(&self) -> Option<&ListPage<R>> {
        match self {
            LoadState::Loaded(page) => Some(page),
            _ => None,
        }
    }
}

type Retain<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;
type SortBy<R> = Arc<dyn Fn(&R, &R) -> Ordering + Send + Sync>;

struct ListInner<R> {
    window: PageWindow,
    state: LoadState<R>,
    cache: PageCache<R>,
}

/// Client-side handle on one paginated remote list.
///
/// Every window change or mutation refetches. Requests are not tagged, so
/// when several are in flight the one that settles last decides the state.
pub struct ResourceList<R> {
    resource: String,
    source: Arc<dyn ListSource<R>>,
    retain: Option<Retain<R>>,
    sort_by: Option<SortBy<R>>,
    inner: RwLock<ListInner<R>>,
}

impl<R: Record> ResourceList<R> {
    pub fn new(
        resource: impl Into<String>,
        source: Arc<dyn ListSource<R>>,
        window: PageWindow,
        cache_pages: usize,
    ) -> Self {
        Self {
            resource: resource.into(),
            source,
            retain: None,
            sort_by: None,
            inner: RwLock::new(ListInner {
                window,
                state: LoadState::Idle,
                cache: PageCache::new(cache_pages),
            }),
        }
    }

    /// Keeps only matching records after each fetch. The server count is
    /// left as reported.
    pub fn retain<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.retain = Some(Arc::new(predicate));
        self
    }

    /// Reorders each fetched page.
    pub fn sort_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&R, &R) -> Ordering + Send + Sync + 'static,
    {
        self.sort_by = Some(Arc::new(compare));
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub async fn window(&self) -> PageWindow {
        self.inner.read().await.window
    }

    pub async fn state(&self) -> LoadState<R> {
        self.inner.read().await.state.clone()
    }

    /// Last fetched copy of the current window, if still cached.
    pub async fn cached(&self) -> Option<ListPage<R>> {
        let mut inner = self.inner.write().await;
        let window = inner.window;
        inner.cache.get(&window)
    }

    /// Moves to a new window. Returns `false` when nothing changed.
    ///
    /// A window fetched earlier shows its cached page until the refetch
    /// settles; an unseen window is `Loading`.
    pub async fn set_window(&self, window: PageWindow) -> bool {
        let mut inner = self.inner.write().await;
        if inner.window == window && !matches!(inner.state, LoadState::Idle) {
            return false;
        }
        inner.window = window;
        let state = Self::pending(&mut inner);
        inner.state = state;
        true
    }

    /// Fetches the current window.
    pub async fn load(&self) -> Result<ListPage<R>> {
        let window = {
            let mut inner = self.inner.write().await;
            let state = Self::pending(&mut inner);
            inner.state = state;
            inner.window
        };
        debug!(
            "fetching {} page {} (size {})",
            self.resource,
            window.page_number(),
            window.page_size
        );

        let result = self.source.fetch_page(&self.resource, window).await;

        let mut inner = self.inner.write().await;
        if inner.window != window {
            debug!(
                "{}: response for page {} settled after a window change",
                self.resource,
                window.page_number()
            );
        }
        match result {
            Ok(page) => {
                let page = self.post_process(page);
                inner.cache.put(window, page.clone());
                inner.state = LoadState::Loaded(page.clone());
                Ok(page)
            }
            Err(err) => {
                warn!("failed to load {}: {}", self.resource, err);
                inner.state = LoadState::Error(err.user_message());
                Err(err)
            }
        }
    }

    /// Drops the current window from the cache and refetches it. The window
    /// itself is kept, so the user stays on the same page.
    pub async fn mutate(&self) -> Result<ListPage<R>> {
        {
            let mut inner = self.inner.write().await;
            let window = inner.window;
            inner.cache.invalidate(&window);
        }
        self.load().await
    }

    /// State while the current window is being fetched.
    fn pending(inner: &mut ListInner<R>) -> LoadState<R> {
        let window = inner.window;
        match inner.cache.get(&window) {
            Some(stale) => LoadState::Loaded(stale),
            None => LoadState::Loading,
        }
    }

    fn post_process(&self, mut page: ListPage<R>) -> ListPage<R> {
        if let Some(retain) = &self.retain {
            page.items.retain(|item| retain(item));
        }
        if let Some(compare) = &self.sort_by {
            page.items.sort_by(|a, b| compare(a, b));
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AdminError, DynamicRecord, Record};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeSource {
        pages: Mutex<Vec<Result<ListPage<DynamicRecord>>>>,
        calls: Mutex<Vec<PageWindow>>,
    }

    impl FakeSource {
        fn new(pages: Vec<Result<ListPage<DynamicRecord>>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ListSource<DynamicRecord> for FakeSource {
        async fn fetch_page(
            &self,
            _resource: &str,
            window: PageWindow,
        ) -> Result<ListPage<DynamicRecord>> {
            self.calls.lock().unwrap().push(window);
            self.pages.lock().unwrap().remove(0)
        }
    }

    fn page(rows: serde_json::Value) -> ListPage<DynamicRecord> {
        let items: Vec<DynamicRecord> = serde_json::from_value(rows).unwrap();
        ListPage {
            count: 25,
            items,
        }
    }

    #[tokio::test]
    async fn test_state_transitions() {
        let source = FakeSource::new(vec![
            Ok(page(json!([{"id": 1}]))),
            Err(AdminError::transport("offline")),
        ]);
        let list = ResourceList::new("customers", source.clone(), PageWindow::default(), 4);
        assert_eq!(list.state().await, LoadState::Idle);

        assert!(list.set_window(PageWindow::default()).await);
        assert!(list.state().await.is_loading());

        list.load().await.unwrap();
        assert_eq!(list.state().await.page().unwrap().items.len(), 1);

        let next = PageWindow::new(1, 10).unwrap();
        assert!(list.set_window(next).await);
        assert!(!list.set_window(next).await);
        assert!(list.load().await.is_err());
        assert_eq!(list.state().await, LoadState::Error("offline".into()));
        assert_eq!(*source.calls.lock().unwrap(), vec![PageWindow::default(), next]);
    }

    #[tokio::test]
    async fn test_mutate_refetches_same_window() {
        let source = FakeSource::new(vec![
            Ok(page(json!([{"id": 1}, {"id": 2}]))),
            Ok(page(json!([{"id": 1}]))),
        ]);
        let window = PageWindow::new(2, 10).unwrap();
        let list = ResourceList::new("orders", source.clone(), window, 4);

        list.load().await.unwrap();
        assert_eq!(list.cached().await.unwrap().items.len(), 2);

        let fresh = list.mutate().await.unwrap();
        assert_eq!(fresh.items.len(), 1);
        assert_eq!(list.window().await, window);
        assert_eq!(*source.calls.lock().unwrap(), vec![window, window]);
    }

    #[tokio::test]
    async fn test_revisited_window_serves_cached_page() {
        let source = FakeSource::new(vec![
            Ok(page(json!([{"id": 1}]))),
            Ok(page(json!([{"id": 11}]))),
            Ok(page(json!([{"id": 1}, {"id": 2}]))),
        ]);
        let first = PageWindow::default();
        let second = PageWindow::new(1, 10).unwrap();
        let list = ResourceList::new("customers", source.clone(), first, 4);

        list.load().await.unwrap();
        list.set_window(second).await;
        list.load().await.unwrap();

        assert!(list.set_window(first).await);
        let state = list.state().await;
        assert!(!state.is_loading());
        assert_eq!(state.page().unwrap().items[0].id(), "1");
        assert_eq!(source.calls.lock().unwrap().len(), 2);

        // Revalidation still runs and replaces the stale page.
        list.load().await.unwrap();
        assert_eq!(list.state().await.page().unwrap().items.len(), 2);
        assert_eq!(source.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_post_fetch_filter_and_sort() {
        let source = FakeSource::new(vec![Ok(page(json!([
            {"id": "a", "n": "3", "status": 2},
            {"id": "b", "n": "1", "status": 1},
            {"id": "c", "n": "2", "status": 2}
        ])))]);
        let list = ResourceList::new("orders", source, PageWindow::default(), 4)
            .retain(|r: &DynamicRecord| r.field("status").as_f64() == Some(2.0))
            .sort_by(|a: &DynamicRecord, b: &DynamicRecord| {
                a.field("n").sort_cmp(&b.field("n"))
            });

        let loaded = list.load().await.unwrap();
        let ids: Vec<String> = loaded.items.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["c", "a"]);
        assert_eq!(loaded.count, 25);
    }
}
