//! Truncation tracking
//!
//! The data contract of every list operation (`ListResult`, `TruncationInfo`)
//! and the merge of several listings into one.

mod aggregator;
mod types;

pub use aggregator::merge;
pub use types::{ListResult, TruncationInfo, TruncationReason};

#[cfg(test)]
mod tests;
