//! Cache module
//!
//! In-memory TTL cache for resolved item collections. Entries hold plain
//! collections only; truncation is re-derived by callers on every read.

mod ttl;

pub use ttl::{CacheStats, Lookup, TtlCache};
