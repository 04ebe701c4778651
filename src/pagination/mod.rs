//! Pagination module
//!
//! Cursor-threaded fetching of complete listings with bounded memory.
//!
//! # Overview
//!
//! - `PaginatedFetcher` - loops over a caller-supplied page fetch function,
//!   applies adaptive sizing, and classifies why it stopped
//! - `HttpPageSource` - page fetch function for a REST list endpoint
//! - `ResponseShape` - enveloped vs bare-array bodies, unwrapped once per page

mod fetcher;
mod source;
mod types;

pub use fetcher::PaginatedFetcher;
pub use source::HttpPageSource;
pub use types::{FetchOptions, FetchPlan, PageMeta, PageRequest, PageResponse, ResponseShape};
