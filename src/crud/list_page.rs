//
//  releasehub-cli
//  crud/list_page.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Paged-list state machine.
//!
//! Every list screen owns a [`ListPage`]: reactive query state (filters plus
//! pagination), the fetched rows, the pre-slice total, and a loading flag.
//! The cycle is `idle → loading → idle` on every fetch; a failed fetch is
//! swallowed here and surfaced through the global notifier, so screens only
//! ever render whatever state the machine holds.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::common::{PageQuery, PageResult, DEFAULT_PAGE_SIZE};
use crate::api::http::ApiError;
use crate::notify;

/// Backend seam of a [`ListPage`].
///
/// Implemented per entity by adapting the matching resource client; tests
/// implement it with canned pages.
#[async_trait]
pub trait PageFetcher<T, F>: Send + Sync
where
    T: Send + 'static,
    F: Send + Sync,
{
    /// Fetches one page matching the query.
    async fn fetch_page(&self, query: &PageQuery<F>) -> Result<PageResult<T>, ApiError>;
}

/// Hook run against the query just before each fetch.
pub type QueryHook<F> = Box<dyn Fn(&mut PageQuery<F>) + Send + Sync>;

/// Hook run against the fetched rows after each successful fetch.
pub type RowsHook<T> = Box<dyn Fn(&[T]) + Send + Sync>;

/// Construction options for a [`ListPage`].
pub struct ListPageOptions<T, F>
where
    T: Send + 'static,
    F: Send + Sync,
{
    fetcher: Arc<dyn PageFetcher<T, F>>,
    default_filter: F,
    immediate: bool,
    before_fetch: Option<QueryHook<F>>,
    after_fetch: Option<RowsHook<T>>,
}

impl<T, F> ListPageOptions<T, F>
where
    T: Send + 'static,
    F: Clone + Send + Sync,
{
    /// Options with the mandatory pieces: a fetcher and the default filter.
    ///
    /// `immediate` defaults to `true` (fetch on [`ListPage::mount`]).
    pub fn new(fetcher: Arc<dyn PageFetcher<T, F>>, default_filter: F) -> Self {
        Self {
            fetcher,
            default_filter,
            immediate: true,
            before_fetch: None,
            after_fetch: None,
        }
    }

    /// Whether [`ListPage::mount`] performs the initial fetch.
    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    /// Registers a hook that may adjust the query just before each fetch.
    pub fn before_fetch(mut self, hook: impl Fn(&mut PageQuery<F>) + Send + Sync + 'static) -> Self {
        self.before_fetch = Some(Box::new(hook));
        self
    }

    /// Registers a hook run with the rows after each successful fetch.
    pub fn after_fetch(mut self, hook: impl Fn(&[T]) + Send + Sync + 'static) -> Self {
        self.after_fetch = Some(Box::new(hook));
        self
    }
}

/// Paged-list state machine.
///
/// # Contract
///
/// - `query` starts as the default filter plus `page = 1, page_size = 10`
/// - [`fetch`](Self::fetch) sets `loading`, runs the before-hook, calls the
///   fetcher, assigns `list`/`total`, runs the after-hook, and always clears
///   `loading`; errors are swallowed and routed to the global notifier
/// - [`search`](Self::search) resets `page` to 1 and fetches
/// - [`reset`](Self::reset) restores filter defaults and `page = 1,
///   page_size = 10`, then fetches
/// - [`on_page_change`](Self::on_page_change) /
///   [`on_page_size_change`](Self::on_page_size_change) mutate the query and
///   fetch; a page-size change resets `page` to 1
///
/// Concurrent fetches are not guarded: the later completion wins by arrival
/// order. Screens drive one action at a time.
pub struct ListPage<T, F>
where
    T: Send + 'static,
    F: Clone + Send + Sync,
{
    fetcher: Arc<dyn PageFetcher<T, F>>,
    default_filter: F,
    immediate: bool,
    before_fetch: Option<QueryHook<F>>,
    after_fetch: Option<RowsHook<T>>,
    /// Reactive query state: filters plus pagination.
    pub query: PageQuery<F>,
    /// Rows of the current page.
    pub list: Vec<T>,
    /// Total matching rows before slicing.
    pub total: u64,
    /// Whether a fetch is in flight.
    pub loading: bool,
}

impl<T, F> ListPage<T, F>
where
    T: Send + 'static,
    F: Clone + Send + Sync,
{
    /// Builds the state machine without fetching.
    pub fn new(options: ListPageOptions<T, F>) -> Self {
        let query = PageQuery::new(options.default_filter.clone());
        Self {
            fetcher: options.fetcher,
            default_filter: options.default_filter,
            immediate: options.immediate,
            before_fetch: options.before_fetch,
            after_fetch: options.after_fetch,
            query,
            list: Vec::new(),
            total: 0,
            loading: false,
        }
    }

    /// Performs the initial fetch when the list was configured as immediate.
    pub async fn mount(&mut self) {
        if self.immediate {
            self.fetch().await;
        }
    }

    /// Fetches the current page.
    pub async fn fetch(&mut self) {
        self.loading = true;

        if let Some(hook) = &self.before_fetch {
            hook(&mut self.query);
        }

        match self.fetcher.fetch_page(&self.query).await {
            Ok(page) => {
                self.list = page.list;
                self.total = page.total;
                if let Some(hook) = &self.after_fetch {
                    hook(&self.list);
                }
            }
            Err(err) => {
                // Swallowed by design: the screen keeps its previous rows
                // and the notifier shows the failure once.
                tracing::warn!("list fetch failed: {err}");
                notify::notify_api_error(&err);
            }
        }

        self.loading = false;
    }

    /// Applies the current filters from page 1.
    pub async fn search(&mut self) {
        self.query.page = 1;
        self.fetch().await;
    }

    /// Restores filter defaults and pagination, then fetches.
    pub async fn reset(&mut self) {
        self.query.filter = self.default_filter.clone();
        self.query.page = 1;
        self.query.page_size = DEFAULT_PAGE_SIZE;
        self.fetch().await;
    }

    /// Jumps to a page.
    pub async fn on_page_change(&mut self, page: u32) {
        self.query.page = page;
        self.fetch().await;
    }

    /// Changes the page size, returning to page 1.
    pub async fn on_page_size_change(&mut self, page_size: u32) {
        self.query.page_size = page_size;
        self.query.page = 1;
        self.fetch().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Clone, Default, PartialEq, Debug)]
    struct Filter {
        keyword: Option<String>,
    }

    /// Canned fetcher that records every query it sees.
    struct Recorder {
        pages: Mutex<Vec<Result<PageResult<&'static str>, ApiError>>>,
        seen: Mutex<Vec<PageQuery<Filter>>>,
    }

    impl Recorder {
        fn returning(pages: Vec<Result<PageResult<&'static str>, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<PageQuery<Filter>> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher<&'static str, Filter> for Recorder {
        async fn fetch_page(
            &self,
            query: &PageQuery<Filter>,
        ) -> Result<PageResult<&'static str>, ApiError> {
            self.seen.lock().unwrap().push(query.clone());
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                Ok(PageResult::empty())
            } else {
                pages.remove(0)
            }
        }
    }

    fn page(list: Vec<&'static str>, total: u64) -> Result<PageResult<&'static str>, ApiError> {
        Ok(PageResult { list, total })
    }

    fn failure() -> Result<PageResult<&'static str>, ApiError> {
        Err(ApiError::network("connection refused", None, None))
    }

    #[tokio::test]
    async fn query_seeds_with_defaults() {
        let fetcher = Recorder::returning(vec![]);
        let list = ListPage::new(ListPageOptions::new(fetcher, Filter::default()));
        assert_eq!(list.query.page, 1);
        assert_eq!(list.query.page_size, 10);
        assert!(!list.loading);
    }

    #[tokio::test]
    async fn mount_fetches_only_when_immediate() {
        let fetcher = Recorder::returning(vec![page(vec!["a"], 1)]);
        let mut list = ListPage::new(ListPageOptions::new(fetcher.clone(), Filter::default()));
        list.mount().await;
        assert_eq!(fetcher.seen().len(), 1);
        assert_eq!(list.list, vec!["a"]);

        let lazy_fetcher = Recorder::returning(vec![]);
        let mut lazy = ListPage::new(
            ListPageOptions::new(lazy_fetcher.clone(), Filter::default()).immediate(false),
        );
        lazy.mount().await;
        assert!(lazy_fetcher.seen().is_empty());
    }

    #[tokio::test]
    async fn search_applies_filter_from_page_one() {
        let fetcher = Recorder::returning(vec![page(vec!["A", "B", "C"], 3)]);
        let mut list = ListPage::new(ListPageOptions::new(fetcher.clone(), Filter::default()));
        list.query.page = 4;
        list.query.filter.keyword = Some("api".to_string());

        list.search().await;

        let seen = fetcher.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].page, 1);
        assert_eq!(seen[0].filter.keyword.as_deref(), Some("api"));
        assert_eq!(list.list, vec!["A", "B", "C"]);
        assert_eq!(list.total, 3);
    }

    #[tokio::test]
    async fn reset_restores_defaults_regardless_of_prior_state() {
        let fetcher = Recorder::returning(vec![page(vec![], 0)]);
        let default_filter = Filter {
            keyword: Some("base".to_string()),
        };
        let mut list = ListPage::new(ListPageOptions::new(fetcher.clone(), default_filter.clone()));
        list.query.filter.keyword = Some("drift".to_string());
        list.query.page = 7;
        list.query.page_size = 50;

        list.reset().await;

        assert_eq!(list.query.filter, default_filter);
        assert_eq!(list.query.page, 1);
        assert_eq!(list.query.page_size, 10);
        assert_eq!(fetcher.seen().len(), 1);
    }

    #[tokio::test]
    async fn page_size_change_returns_to_page_one_before_fetching() {
        let fetcher = Recorder::returning(vec![page(vec![], 0)]);
        let mut list = ListPage::new(ListPageOptions::new(fetcher.clone(), Filter::default()));
        list.query.page = 3;

        list.on_page_size_change(25).await;

        let seen = fetcher.seen();
        assert_eq!(seen[0].page_size, 25);
        assert_eq!(seen[0].page, 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_swallowed_and_clears_loading() {
        let fetcher = Recorder::returning(vec![page(vec!["kept"], 1), failure()]);
        let mut list = ListPage::new(ListPageOptions::new(fetcher, Filter::default()));

        list.fetch().await;
        assert_eq!(list.list, vec!["kept"]);

        // The failed fetch keeps the previous rows and never panics.
        list.fetch().await;
        assert_eq!(list.list, vec!["kept"]);
        assert_eq!(list.total, 1);
        assert!(!list.loading);
    }

    #[tokio::test]
    async fn hooks_run_around_the_fetch() {
        let fetcher = Recorder::returning(vec![page(vec!["x", "y"], 2)]);
        let rows_seen = Arc::new(Mutex::new(0usize));
        let rows_seen_hook = rows_seen.clone();

        let mut list = ListPage::new(
            ListPageOptions::new(fetcher.clone(), Filter::default())
                .before_fetch(|query| query.filter.keyword = Some("forced".to_string()))
                .after_fetch(move |rows| *rows_seen_hook.lock().unwrap() = rows.len()),
        );
        list.fetch().await;

        assert_eq!(fetcher.seen()[0].filter.keyword.as_deref(), Some("forced"));
        assert_eq!(*rows_seen.lock().unwrap(), 2);
    }
}
