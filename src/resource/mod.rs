//! Resource module
//!
//! Typed entry points per resource kind: cached, retried, paginated listings
//! plus the single-record operations that invalidate them.

mod accessor;
mod client;
mod scope;

pub use accessor::{ResourceAccessor, ResourceCache};
pub use client::ResourceClient;
pub use scope::Scope;
