//! Merge of several independent listings
//!
//! Used when one logical list spans several sub-scopes (one fetch per
//! workspace, or a task search next to a project search).

use super::types::{ListResult, TruncationReason};
use tracing::debug;

/// Concatenate `results` in order and compute one truncation outcome.
///
/// The first truncated input decides the reason. If `final_limit` cuts the
/// combined list, the reason becomes `max_items`. The returned count is taken
/// from the final vector, after all slicing.
pub fn merge<T>(
    results: impl IntoIterator<Item = ListResult<T>>,
    final_limit: Option<usize>,
) -> ListResult<T> {
    let mut items = Vec::new();
    let mut first_truncation = None;

    for (index, result) in results.into_iter().enumerate() {
        let (part, truncation) = result.into_parts();
        if first_truncation.is_none() {
            if let Some(info) = truncation {
                debug!(scope = index, reason = %info.reason(), "first truncated sub-listing");
                first_truncation = Some(info);
            }
        }
        items.extend(part);
    }

    let mut sliced_at = None;
    if let Some(limit) = final_limit {
        if items.len() > limit {
            items.truncate(limit);
            sliced_at = Some(limit);
        }
    }

    match (sliced_at, first_truncation) {
        (Some(limit), first) => {
            let page_size = first.map_or(limit, |info| info.page_size());
            ListResult::truncated(items, TruncationReason::MaxItems, page_size)
        }
        (None, Some(info)) => ListResult::truncated(items, info.reason(), info.page_size()),
        (None, None) => ListResult::complete(items),
    }
}
