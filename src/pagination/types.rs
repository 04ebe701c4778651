//! Pagination types
//!
//! Page requests and responses exchanged with the caller-supplied page fetch
//! function, plus the response-shape unwrapping done at that boundary.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Parameters of one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Cursor returned by the previous page, `None` for the first page
    pub cursor: Option<String>,
    /// Number of items asked for; always at least 1
    pub page_size: usize,
}

/// One page of upstream data
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse<T> {
    /// Items of this page
    pub items: Vec<T>,
    /// Cursor of the next page, `None` when the upstream signals the end
    pub next_cursor: Option<String>,
    /// Page size the upstream reports having applied, if it says so
    pub page_size: Option<usize>,
}

impl<T> PageResponse<T> {
    /// A page with no next cursor
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
            page_size: None,
        }
    }

    /// A page followed by another one
    pub fn with_next(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
            page_size: None,
        }
    }

    /// Record the page size reported by the upstream
    #[must_use]
    pub fn reported_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }
}

/// Per-call options of a paginated fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Page-count cap, defaults to the fetcher's configured cap
    pub max_pages: Option<u32>,
    /// Item cap; `None` fetches until the upstream or page cap stops it
    pub item_limit: Option<usize>,
    /// Page size, defaults to the fetcher's configured size
    pub page_size: Option<usize>,
    /// Stops the fetch between pages and between retry attempts
    pub cancel: Option<CancellationToken>,
}

impl FetchOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the item cap
    #[must_use]
    pub fn item_limit(mut self, limit: usize) -> Self {
        self.item_limit = Some(limit);
        self
    }

    /// Set the page-count cap
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Set the page size
    #[must_use]
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Attach a cancellation token
    #[must_use]
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Sizing decided once, before the first request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPlan {
    /// Items per full page
    pub page_size: usize,
    /// Pages that may be requested, after adaptive sizing
    pub max_pages: u32,
    /// Item cap, if any
    pub item_limit: Option<usize>,
}

impl FetchPlan {
    /// Size of the next request after `fetched` items.
    ///
    /// A remainder of zero asks for a full page rather than zero items, which
    /// some upstreams read as "no limit".
    pub fn request_size(&self, fetched: usize) -> usize {
        match self.item_limit {
            Some(limit) => match limit.saturating_sub(fetched) {
                0 => self.page_size,
                remaining => remaining.min(self.page_size),
            },
            None => self.page_size,
        }
    }
}

/// Pagination metadata of an enveloped response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default, alias = "nextCursor", alias = "next")]
    pub next_cursor: Option<String>,
    #[serde(default, alias = "pageSize", alias = "limit")]
    pub page_size: Option<usize>,
}

/// The two body shapes the upstream uses for list endpoints.
///
/// Resolved once when a page is decoded; the fetcher only sees `PageResponse`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ResponseShape<T> {
    /// `{"data": [...], "meta": {"next_cursor": ...}}` and close variants
    Wrapped {
        #[serde(alias = "data", alias = "results")]
        items: Vec<T>,
        #[serde(default)]
        meta: PageMeta,
        #[serde(default, alias = "nextCursor")]
        next_cursor: Option<String>,
    },
    /// A plain JSON array; there is never a next page
    Bare(Vec<T>),
}

impl<T> From<ResponseShape<T>> for PageResponse<T> {
    fn from(shape: ResponseShape<T>) -> Self {
        match shape {
            ResponseShape::Wrapped {
                items,
                meta,
                next_cursor,
            } => Self {
                items,
                next_cursor: meta.next_cursor.or(next_cursor),
                page_size: meta.page_size,
            },
            ResponseShape::Bare(items) => Self::last(items),
        }
    }
}
