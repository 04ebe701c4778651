//! Tests for truncation tracking

use super::*;
use pretty_assertions::assert_eq;

fn numbers(range: std::ops::Range<u32>) -> Vec<u32> {
    range.collect()
}

// ============================================================================
// ListResult Tests
// ============================================================================

#[test]
fn test_complete_has_no_truncation() {
    let result = ListResult::complete(numbers(0..3));
    assert!(!result.is_truncated());
    assert!(result.truncation().is_none());
    assert_eq!(result.len(), 3);
}

#[test]
fn test_truncated_counts_final_items() {
    let result = ListResult::truncated(numbers(0..7), TruncationReason::MaxPages, 50);
    let info = result.truncation().unwrap();
    assert_eq!(info.reason(), TruncationReason::MaxPages);
    assert_eq!(info.returned_count(), 7);
    assert_eq!(info.page_size(), 50);
}

#[test]
fn test_from_collection_depends_on_current_limit() {
    let cached = numbers(0..30);

    let small = ListResult::from_collection(cached.clone(), 10, 50);
    assert_eq!(small.len(), 10);
    assert_eq!(
        small.truncation().map(TruncationInfo::reason),
        Some(TruncationReason::MaxItems)
    );
    assert_eq!(small.truncation().unwrap().returned_count(), 10);

    let large = ListResult::from_collection(cached, 100, 50);
    assert_eq!(large.len(), 30);
    assert!(!large.is_truncated());
}

#[test]
fn test_from_collection_exactly_at_limit_is_complete() {
    let result = ListResult::from_collection(numbers(0..20), 20, 50);
    assert_eq!(result.len(), 20);
    assert!(!result.is_truncated());
}

#[test]
fn test_serialization() {
    let complete = ListResult::complete(vec!["a"]);
    assert_eq!(
        serde_json::to_value(&complete).unwrap(),
        serde_json::json!({"items": ["a"]})
    );

    let truncated = ListResult::truncated(vec!["a", "b"], TruncationReason::PageSizeLimit, 25);
    assert_eq!(
        serde_json::to_value(&truncated).unwrap(),
        serde_json::json!({
            "items": ["a", "b"],
            "truncation": {
                "reason": "page_size_limit",
                "returned_count": 2,
                "page_size": 25
            }
        })
    );
}

#[test]
fn test_reason_wire_names() {
    assert_eq!(TruncationReason::MaxItems.to_string(), "max_items");
    assert_eq!(TruncationReason::MaxPages.as_str(), "max_pages");
    assert!(!TruncationReason::PageSizeLimit.notice().is_empty());
}

// ============================================================================
// Merge Tests
// ============================================================================

#[test]
fn test_merge_preserves_order() {
    let merged = merge(
        vec![
            ListResult::complete(numbers(0..2)),
            ListResult::complete(numbers(10..12)),
        ],
        None,
    );
    assert_eq!(merged.items(), &[0, 1, 10, 11]);
    assert!(!merged.is_truncated());
}

#[test]
fn test_merge_first_truncation_wins() {
    let merged = merge(
        vec![
            ListResult::complete(numbers(0..3)),
            ListResult::truncated(numbers(3..6), TruncationReason::MaxPages, 3),
            ListResult::truncated(numbers(6..8), TruncationReason::MaxItems, 2),
        ],
        None,
    );

    let info = merged.truncation().unwrap();
    assert_eq!(info.reason(), TruncationReason::MaxPages);
    assert_eq!(info.page_size(), 3);
    assert_eq!(info.returned_count(), 8);
    assert_eq!(merged.len(), 8);
}

#[test]
fn test_merge_final_limit_marks_max_items() {
    let merged = merge(
        vec![
            ListResult::complete(numbers(0..4)),
            ListResult::complete(numbers(4..8)),
            ListResult::complete(numbers(8..12)),
        ],
        Some(10),
    );

    assert_eq!(merged.len(), 10);
    let info = merged.truncation().unwrap();
    assert_eq!(info.reason(), TruncationReason::MaxItems);
    assert_eq!(info.returned_count(), 10);
    assert_eq!(info.page_size(), 10);
}

#[test]
fn test_merge_slice_overrides_earlier_reason() {
    let merged = merge(
        vec![
            ListResult::truncated(numbers(0..5), TruncationReason::PageSizeLimit, 5),
            ListResult::complete(numbers(5..10)),
        ],
        Some(7),
    );

    let info = merged.truncation().unwrap();
    assert_eq!(info.reason(), TruncationReason::MaxItems);
    assert_eq!(info.returned_count(), 7);
    assert_eq!(info.page_size(), 5);
}

#[test]
fn test_merge_limit_not_exceeded_keeps_completeness() {
    let merged = merge(
        vec![
            ListResult::complete(numbers(0..4)),
            ListResult::complete(numbers(4..8)),
        ],
        Some(8),
    );
    assert_eq!(merged.len(), 8);
    assert!(!merged.is_truncated());
}

#[test]
fn test_merge_count_reflects_later_scopes() {
    let merged = merge(
        vec![
            ListResult::truncated(numbers(0..2), TruncationReason::MaxItems, 2),
            ListResult::complete(numbers(2..9)),
        ],
        None,
    );
    assert_eq!(merged.truncation().unwrap().returned_count(), 9);
}

#[test]
fn test_merge_empty_input() {
    let merged: ListResult<u32> = merge(Vec::new(), Some(5));
    assert!(merged.is_empty());
    assert!(!merged.is_truncated());
}
