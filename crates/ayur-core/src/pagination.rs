//! Pagination types for list screens
//!
//! Pages are 1-indexed. A page beyond the last one is an empty slice, never an error.

use serde::{Deserialize, Serialize};

/// Number of numbered buttons a pager shows
pub const MAX_PAGE_BUTTONS: u32 = 5;

/// Default page size for list screens
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination parameters sent as `page` / `limit`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    pub page: u32,

    /// Items per page
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, 1000),
        }
    }

    pub fn first(limit: u32) -> Self {
        Self::new(1, limit)
    }

    /// Index of the first record on this page
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.limit as usize
    }

    pub fn with_page(self, page: u32) -> Self {
        Self::new(page, self.limit)
    }
}

/// `ceil(total / limit)`, zero when there is nothing to page through
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit)) as u32
}

/// One page of records as the backend returns it
///
/// Accepts `{ data, total }` or `{ items, total }`; the page fields are optional
/// on the wire and filled in from the request by [`Page::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "items", default = "Vec::new")]
    pub data: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub limit: u32,

    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            total_pages: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            page: request.page,
            limit: request.limit,
            total_pages: 0,
        }
    }

    /// Fill page fields the backend left out
    pub fn normalize(mut self, request: PageRequest) -> Self {
        if self.page == 0 {
            self.page = request.page;
        }
        if self.limit == 0 {
            self.limit = request.limit;
        }
        if self.total == 0 && !self.data.is_empty() {
            self.total = self.data.len() as u64;
        }
        self.total_pages = total_pages(self.total, self.limit);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}

impl<T: Clone> Page<T> {
    /// Slice `[(page-1)*limit, page*limit)` out of a full collection
    pub fn from_slice(all: &[T], request: PageRequest) -> Self {
        let start = request.offset().min(all.len());
        let end = (start + request.limit as usize).min(all.len());
        let total = all.len() as u64;
        Self {
            data: all[start..end].to_vec(),
            total,
            page: request.page,
            limit: request.limit,
            total_pages: total_pages(total, request.limit),
        }
    }
}

/// What a pager control renders for the current page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pager {
    pub current: u32,
    pub total_pages: u32,
    /// Numbered buttons, always starting at 1
    pub buttons: Vec<u32>,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl Pager {
    pub fn new(current: u32, total: u64, limit: u32) -> Self {
        let pages = total_pages(total, limit);
        Self {
            current,
            total_pages: pages,
            buttons: (1..=pages.min(MAX_PAGE_BUTTONS)).collect(),
            previous_enabled: current > 1,
            next_enabled: current < pages,
        }
    }

    /// Whether `page` is a page the pager lets you move to
    pub fn accepts(&self, page: u32) -> bool {
        page == 1 || (page >= 1 && page <= self.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_bounds() {
        let req = PageRequest::new(0, 0);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 1);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 2), 3);
    }

    #[test]
    fn test_from_slice_lengths() {
        let data: Vec<u32> = (0..23).collect();
        for page in 1..=5 {
            for limit in [1u32, 5, 10, 30] {
                let result = Page::from_slice(&data, PageRequest::new(page, limit));
                let expected = (limit as usize)
                    .min(data.len().saturating_sub((page as usize - 1) * limit as usize));
                assert_eq!(result.data.len(), expected, "page {page} limit {limit}");
                assert_eq!(result.total, 23);
                assert_eq!(result.total_pages, total_pages(23, limit));
            }
        }
    }

    #[test]
    fn test_from_slice_past_end_is_empty() {
        let data = vec!["a", "b", "c"];
        let page = Page::from_slice(&data, PageRequest::new(9, 2));
        assert!(page.is_empty());
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_deserialize_items_alias() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"items":[1,2],"total":7}"#).unwrap();
        let page = page.normalize(PageRequest::new(2, 2));
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 4);
    }

    #[test]
    fn test_deserialize_full_shape() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"data":[1],"total":1,"page":1,"limit":10,"totalPages":1}"#,
        )
        .unwrap();
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_pager_buttons_cap_at_five() {
        let pager = Pager::new(7, 120, 10);
        assert_eq!(pager.total_pages, 12);
        assert_eq!(pager.buttons, vec![1, 2, 3, 4, 5]);
        assert!(pager.previous_enabled);
        assert!(pager.next_enabled);
    }

    #[test]
    fn test_pager_boundaries() {
        let first = Pager::new(1, 25, 10);
        assert!(!first.previous_enabled);
        assert!(first.next_enabled);
        assert_eq!(first.buttons, vec![1, 2, 3]);

        let last = Pager::new(3, 25, 10);
        assert!(!last.next_enabled);
        assert!(last.accepts(2));
        assert!(!last.accepts(4));

        let empty = Pager::new(1, 0, 10);
        assert!(empty.buttons.is_empty());
        assert!(!empty.next_enabled);
        assert!(empty.accepts(1));
    }
}
