//! # listguard
//!
//! Resilient access to cursor-paginated REST APIs: bounded retries with
//! backoff, capped pagination, explicit truncation reporting and a TTL cache.
//!
//! ## Features
//!
//! - **Retry**: Exponential backoff with jitter, honoring `Retry-After`
//! - **Pagination**: Cursor threading with page and item caps, adaptive page sizes
//! - **Truncation**: Every listing says whether, and why, it was cut short
//! - **Caching**: Per-resource TTLs, substring invalidation after mutations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listguard::{ListguardConfig, ResourceClient, ResourceKind, Scope};
//!
//! #[tokio::main]
//! async fn main() -> listguard::Result<()> {
//!     let config = ListguardConfig::from_file("listguard.yaml")?;
//!     let projects = ResourceClient::new(config)?
//!         .accessor::<serde_json::Value>(ResourceKind::Projects);
//!
//!     let result = projects.list(&Scope::workspace("A"), Some(20)).await?;
//!     if let Some(info) = result.truncation() {
//!         eprintln!("{}", info.reason().notice());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ResourceAccessor (per kind)                │
//! │   list()  list_across()  get()  create/update/delete()      │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────┬────────────────┴─────┬──────────────┬──────────┐
//! │  TtlCache  │  PaginatedFetcher    │  Truncation  │  Retry   │
//! ├────────────┼──────────────────────┼──────────────┼──────────┤
//! │ TTL expiry │ cursor threading     │ ListResult   │ backoff  │
//! │ invalidate │ page / item caps     │ merge        │ jitter   │
//! └────────────┴──────────────────────┴──────────────┴──────────┘
//!                               │
//!                   HttpClient (single attempt, rate limit)
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// YAML configuration
pub mod config;

/// Single-attempt HTTP transport with rate limiting
pub mod http;

/// Retry with exponential backoff
pub mod retry;

/// Cursor pagination with caps
pub mod pagination;

/// Truncation metadata and result merging
pub mod truncation;

/// TTL cache
pub mod cache;

/// Per-resource accessors
pub mod resource;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use cache::TtlCache;
pub use config::ListguardConfig;
pub use pagination::{FetchOptions, PaginatedFetcher};
pub use resource::{ResourceAccessor, ResourceClient, Scope};
pub use retry::{RetryExecutor, RetryPolicy};
pub use truncation::{merge, ListResult, TruncationInfo, TruncationReason};
