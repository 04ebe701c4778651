//! Paginated fetcher
//!
//! Drives a caller-supplied page fetch function until a stop condition holds,
//! then classifies why it stopped. Stop conditions, checked after each page:
//!
//! 1. the item limit is reached (`max_items`)
//! 2. the upstream returns no next cursor (complete, or `page_size_limit` for a
//!    short page under [`CompletionPolicy::Ambiguous`])
//! 3. the page cap is reached while a cursor remains (`max_pages`)

use super::types::{FetchOptions, FetchPlan, PageRequest, PageResponse};
use crate::config::PaginationConfig;
use crate::error::{Error, Result};
use crate::retry::RetryExecutor;
use crate::truncation::{ListResult, TruncationReason};
use crate::types::{CompletionPolicy, OptionStringExt};
use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Why the fetch loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    ItemLimit(usize),
    Exhausted,
    ShortPage { expected: usize },
    PageCap,
}

/// Fetches every page of a listing within configured bounds
#[derive(Debug, Clone)]
pub struct PaginatedFetcher {
    page_size: usize,
    max_page_size: usize,
    max_pages: u32,
    max_item_limit: usize,
    completion: CompletionPolicy,
    retry: Option<RetryExecutor>,
}

impl Default for PaginatedFetcher {
    fn default() -> Self {
        Self::new(&PaginationConfig::default())
    }
}

impl PaginatedFetcher {
    /// Create a fetcher from configuration
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            page_size: config.default_page_size,
            max_page_size: config.max_page_size,
            max_pages: config.default_max_pages,
            max_item_limit: config.max_item_limit,
            completion: config.completion,
            retry: None,
        }
    }

    /// Retry every page call with `executor`
    #[must_use]
    pub fn with_retry(mut self, executor: RetryExecutor) -> Self {
        self.retry = Some(executor);
        self
    }

    /// Override the completion policy
    #[must_use]
    pub fn with_completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    /// Validate `options` and decide sizing, before any network call
    pub fn plan(&self, options: &FetchOptions) -> Result<FetchPlan> {
        let page_size = options.page_size.unwrap_or(self.page_size);
        if page_size == 0 {
            return Err(Error::invalid_input("page_size", "must be greater than zero"));
        }
        if page_size > self.max_page_size {
            return Err(Error::invalid_input(
                "page_size",
                format!("{page_size} exceeds the maximum of {}", self.max_page_size),
            ));
        }

        let max_pages = options.max_pages.unwrap_or(self.max_pages);
        if max_pages == 0 {
            return Err(Error::invalid_input("max_pages", "must be at least 1"));
        }

        let max_pages = match options.item_limit {
            Some(0) => {
                return Err(Error::invalid_input("item_limit", "must be greater than zero"));
            }
            Some(limit) if limit > self.max_item_limit => {
                return Err(Error::invalid_input(
                    "item_limit",
                    format!("{limit} exceeds the maximum of {}", self.max_item_limit),
                ));
            }
            Some(limit) => {
                let needed = u32::try_from(limit.div_ceil(page_size)).unwrap_or(u32::MAX);
                max_pages.min(needed)
            }
            None => max_pages,
        };

        Ok(FetchPlan {
            page_size,
            max_pages,
            item_limit: options.item_limit,
        })
    }

    /// Fetch pages through `fetch_page` until a stop condition holds.
    ///
    /// Upstream errors propagate as-is (after retries, if configured). Invalid
    /// options fail before `fetch_page` is ever called.
    pub async fn fetch_all<T, F, Fut>(
        &self,
        mut fetch_page: F,
        options: FetchOptions,
    ) -> Result<ListResult<T>>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<PageResponse<T>>>,
    {
        let plan = self.plan(&options)?;
        let cancel = options.cancel.as_ref();

        let mut items: Vec<T> = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0u32;

        let stop = loop {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                return Err(Error::Cancelled);
            }

            let request = PageRequest {
                cursor: cursor.take(),
                page_size: plan.request_size(items.len()),
            };
            let requested = request.page_size;
            let page = self.fetch_page(&mut fetch_page, request, cancel).await?;
            pages += 1;

            let received = page.items.len();
            let next_cursor = page.next_cursor.none_if_empty();
            items.extend(page.items);
            debug!(
                page = pages,
                items = received,
                total = items.len(),
                has_next = next_cursor.is_some(),
                "fetched page"
            );

            if let Some(limit) = plan.item_limit {
                if items.len() >= limit {
                    break Stop::ItemLimit(limit);
                }
            }

            let Some(next) = next_cursor else {
                let expected = page.page_size.unwrap_or(requested);
                let short = received > 0 && received < expected;
                if short && self.completion == CompletionPolicy::Ambiguous {
                    break Stop::ShortPage { expected };
                }
                break Stop::Exhausted;
            };

            if pages >= plan.max_pages {
                break Stop::PageCap;
            }
            cursor = Some(next);
        };

        let result = match stop {
            Stop::ItemLimit(limit) => {
                items.truncate(limit);
                ListResult::truncated(items, TruncationReason::MaxItems, plan.page_size)
            }
            Stop::Exhausted => ListResult::complete(items),
            Stop::ShortPage { expected } => {
                ListResult::truncated(items, TruncationReason::PageSizeLimit, expected)
            }
            Stop::PageCap => ListResult::truncated(items, TruncationReason::MaxPages, plan.page_size),
        };

        match result.truncation() {
            Some(info) => info!(
                pages,
                items = info.returned_count(),
                reason = %info.reason(),
                "listing truncated"
            ),
            None => debug!(pages, items = result.len(), "listing complete"),
        }
        Ok(result)
    }

    async fn fetch_page<T, F, Fut>(
        &self,
        fetch_page: &mut F,
        request: PageRequest,
        cancel: Option<&CancellationToken>,
    ) -> Result<PageResponse<T>>
    where
        F: FnMut(PageRequest) -> Fut,
        Fut: Future<Output = Result<PageResponse<T>>>,
    {
        match (&self.retry, cancel) {
            (Some(executor), Some(token)) => {
                executor
                    .execute_until(token, || fetch_page(request.clone()))
                    .await
            }
            (Some(executor), None) => executor.execute(|| fetch_page(request.clone())).await,
            (None, _) => fetch_page(request).await,
        }
    }
}
