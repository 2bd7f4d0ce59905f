//
//  releasehub-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for ReleaseHub API Responses
//!
//! This module provides the pagination structures shared by every paged
//! screen. The backend is not uniform: newer endpoint families paginate
//! server-side (`/paged` endpoints returning [`ServerPage`]), while legacy
//! endpoints return the full list and leave slicing to the caller. Both
//! strategies are abstracted behind [`PageResult`], so the list state
//! machine's contract stays uniform regardless of which backing strategy a
//! given entity uses.
//!
//! # Overview
//!
//! | Type | Role |
//! |------|------|
//! | [`PageQuery`] | Outgoing query state: 1-based page, page size, filters |
//! | [`PageResult`] | Normalized page: items plus the pre-slice total |
//! | [`ServerPage`] | Wire shape of server-paginated `/paged` replies |
//! | [`PaginationMode`] | Capability flag: server- vs client-paginated entity |
//!
//! # Page Index Convention
//!
//! All request parameters are 1-based (`page=1` is the first page) with the
//! page size sent as `size`. Legacy 0-based variants are not replicated.
//!
//! # Notes
//!
//! - `PageResult::total` always reflects the count before any slicing, even
//!   when pagination is emulated client-side via [`paginate`].

use serde::{Deserialize, Serialize};

/// Default page size seeded into every new [`PageQuery`].
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Query state for a paged screen.
///
/// Created with defaults by the list state machine, mutated by user
/// search/reset/page actions, and discarded when the owning screen goes
/// away. The filter type `F` carries the entity-specific filter fields.
///
/// # Example
///
/// ```rust
/// use releasehub_cli::api::common::PageQuery;
///
/// #[derive(Clone, Default, PartialEq, Debug)]
/// struct Filter {
///     keyword: Option<String>,
/// }
///
/// let query = PageQuery::new(Filter::default());
/// assert_eq!(query.page, 1);
/// assert_eq!(query.page_size, 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery<F> {
    /// 1-based page index.
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
    /// Entity-specific filter fields.
    pub filter: F,
}

impl<F> PageQuery<F> {
    /// Creates a query seeded with `page = 1` and the default page size.
    pub fn new(filter: F) -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filter,
        }
    }
}

impl<F: Default> Default for PageQuery<F> {
    fn default() -> Self {
        Self::new(F::default())
    }
}

/// One page of results, normalized from either pagination strategy.
///
/// `total` is the number of items matching the query across all pages,
/// never the length of `list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Items in the current page.
    pub list: Vec<T>,
    /// Total matching items before any slicing.
    pub total: u64,
}

impl<T> PageResult<T> {
    /// An empty page.
    pub fn empty() -> Self {
        Self {
            list: Vec::new(),
            total: 0,
        }
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wire shape of server-paginated `/paged` replies.
///
/// The newer endpoint families return their items under `data` with a
/// `page` block carrying the total. Convert with
/// [`into_page_result`](Self::into_page_result) before handing the page to
/// a list state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerPage<T> {
    /// Items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub page: PageMeta,
}

/// Pagination metadata of a [`ServerPage`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-based page index of this page.
    #[serde(default)]
    pub page: u32,
    /// Requested page size.
    #[serde(default)]
    pub size: u32,
    /// Total matching items across all pages.
    #[serde(default)]
    pub total: u64,
}

impl<T> ServerPage<T> {
    /// Normalizes the server page into a [`PageResult`].
    pub fn into_page_result(self) -> PageResult<T> {
        PageResult {
            list: self.data,
            total: self.page.total,
        }
    }
}

/// How an entity's list endpoint paginates.
///
/// Legacy resource clients only expose a full list; they are tagged
/// [`Client`](Self::Client) and go through [`paginate`] so the pre-slice
/// total invariant still holds. The flag is informational for callers; the
/// list contract is identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// The backend slices; requests carry `page`/`size` parameters.
    Server,
    /// The backend returns the full list; slicing happens in the client.
    Client,
}

/// Slices a full list into one page, keeping the pre-slice total.
///
/// Used by the legacy (client-paginated) resource clients. A `page` of 0 is
/// treated as 1.
///
/// # Example
///
/// ```rust
/// use releasehub_cli::api::common::paginate;
///
/// let page = paginate(vec![1, 2, 3, 4, 5], 2, 2);
/// assert_eq!(page.list, vec![3, 4]);
/// assert_eq!(page.total, 5);
/// ```
pub fn paginate<T>(items: Vec<T>, page: u32, page_size: u32) -> PageResult<T> {
    let total = items.len() as u64;
    let page = page.max(1);
    let start = ((page - 1) as usize).saturating_mul(page_size as usize);
    let list = items
        .into_iter()
        .skip(start)
        .take(page_size as usize)
        .collect();
    PageResult { list, total }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginate_keeps_pre_slice_total() {
        let page = paginate((1..=25).collect::<Vec<_>>(), 3, 10);
        assert_eq!(page.list, (21..=25).collect::<Vec<_>>());
        assert_eq!(page.total, 25);
    }

    #[test]
    fn paginate_past_the_end_is_empty_with_total() {
        let page = paginate(vec!["a", "b"], 9, 10);
        assert!(page.list.is_empty());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn paginate_treats_page_zero_as_first() {
        let page = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(page.list, vec![1, 2]);
    }

    #[test]
    fn server_page_normalizes() {
        let json = r#"{"data":[{"id":"r-1"}],"page":{"page":1,"size":10,"total":42}}"#;
        let page: ServerPage<serde_json::Value> = serde_json::from_str(json).unwrap();
        let result = page.into_page_result();
        assert_eq!(result.list.len(), 1);
        assert_eq!(result.total, 42);
    }
}
