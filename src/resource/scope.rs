//! Listing scopes
//!
//! A scope is the ordered set of query parameters that narrows a listing
//! (a workspace, a project, a task). It also names the listing in the cache.

use crate::types::ResourceKind;
use std::fmt;

/// Ordered query parameters identifying one sub-listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Scope {
    params: Vec<(String, String)>,
}

impl Scope {
    /// The unscoped listing
    pub fn all() -> Self {
        Self::default()
    }

    /// Listing within one workspace
    pub fn workspace(id: impl Into<String>) -> Self {
        Self::all().with("workspace", id)
    }

    /// Add a parameter
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Parameters in insertion order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Cache key of this scope's listing of `kind`, e.g. `projects:workspace:A`
    pub fn cache_key(&self, kind: ResourceKind) -> String {
        format!("{kind}{self}")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.params {
            write!(f, ":{key}:{value}")?;
        }
        Ok(())
    }
}
