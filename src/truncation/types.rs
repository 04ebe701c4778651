//! List result and truncation types
//!
//! `ListResult<T>` is the value every list operation hands back. Its
//! `TruncationInfo` is derived from the final item vector at construction,
//! so the reported count can never drift from what the caller receives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a listing stopped before the upstream was known to be exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationReason {
    /// A short page arrived without an explicit end-of-data signal
    PageSizeLimit,
    /// The caller's item cap was hit
    MaxItems,
    /// The safety cap on page count was hit
    MaxPages,
}

impl TruncationReason {
    /// Wire name of the reason
    pub fn as_str(self) -> &'static str {
        match self {
            TruncationReason::PageSizeLimit => "page_size_limit",
            TruncationReason::MaxItems => "max_items",
            TruncationReason::MaxPages => "max_pages",
        }
    }

    /// One-line explanation for callers that surface the truncation
    pub fn notice(self) -> &'static str {
        match self {
            TruncationReason::PageSizeLimit => {
                "upstream returned a short page without confirming the end of the data"
            }
            TruncationReason::MaxItems => "more items exist than the requested limit",
            TruncationReason::MaxPages => "the page-count safety limit was reached",
        }
    }
}

impl fmt::Display for TruncationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details of an incomplete listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TruncationInfo {
    reason: TruncationReason,
    returned_count: usize,
    page_size: usize,
}

impl TruncationInfo {
    /// Why fetching stopped
    pub fn reason(&self) -> TruncationReason {
        self.reason
    }

    /// Number of items actually handed to the caller
    pub fn returned_count(&self) -> usize {
        self.returned_count
    }

    /// Page size (or bounding limit) in effect when fetching stopped
    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

/// Items of one list operation plus truncation status
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResult<T> {
    items: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncation: Option<TruncationInfo>,
}

impl<T> ListResult<T> {
    /// A listing that reached the end of the upstream data
    pub fn complete(items: Vec<T>) -> Self {
        Self {
            items,
            truncation: None,
        }
    }

    /// A listing that stopped early
    pub fn truncated(items: Vec<T>, reason: TruncationReason, page_size: usize) -> Self {
        let truncation = Some(TruncationInfo {
            reason,
            returned_count: items.len(),
            page_size,
        });
        Self { items, truncation }
    }

    /// Derive truncation for a complete plain collection under the caller's
    /// current `limit`; only cutting it can make the result incomplete.
    pub fn from_collection(mut items: Vec<T>, limit: usize, page_size: usize) -> Self {
        if items.len() > limit {
            items.truncate(limit);
            return Self::truncated(items, TruncationReason::MaxItems, page_size);
        }
        Self::complete(items)
    }

    /// The items
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Truncation details, `None` when the listing is complete
    pub fn truncation(&self) -> Option<&TruncationInfo> {
        self.truncation.as_ref()
    }

    /// Whether fetching stopped early
    pub fn is_truncated(&self) -> bool {
        self.truncation.is_some()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop truncation details and keep the items
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Split into items and truncation details
    pub fn into_parts(self) -> (Vec<T>, Option<TruncationInfo>) {
        (self.items, self.truncation)
    }
}
