//! Retry module
//!
//! Retry-on-failure for single network calls. Knows nothing about
//! pagination or caching; callers wrap whatever call they need retried.

mod executor;

pub use executor::{RetryExecutor, RetryPolicy};
