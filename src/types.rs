//! Common types used throughout listguard
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Resource Kind
// ============================================================================

/// Resource categories served by the upstream API.
///
/// Each kind owns its own cache and TTL; reference data changes rarely and is
/// kept longer than task-level data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Workspaces,
    Users,
    Projects,
    Tasks,
    Comments,
    CustomFields,
    RecurringItems,
    Schedules,
    Statuses,
}

impl ResourceKind {
    /// All kinds, in declaration order
    pub const ALL: [ResourceKind; 9] = [
        ResourceKind::Workspaces,
        ResourceKind::Users,
        ResourceKind::Projects,
        ResourceKind::Tasks,
        ResourceKind::Comments,
        ResourceKind::CustomFields,
        ResourceKind::RecurringItems,
        ResourceKind::Schedules,
        ResourceKind::Statuses,
    ];

    /// Snake-case name, also used as the cache key prefix
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Workspaces => "workspaces",
            ResourceKind::Users => "users",
            ResourceKind::Projects => "projects",
            ResourceKind::Tasks => "tasks",
            ResourceKind::Comments => "comments",
            ResourceKind::CustomFields => "custom_fields",
            ResourceKind::RecurringItems => "recurring_items",
            ResourceKind::Schedules => "schedules",
            ResourceKind::Statuses => "statuses",
        }
    }

    /// Upstream collection path
    pub fn path(self) -> &'static str {
        match self {
            ResourceKind::Workspaces => "/workspaces",
            ResourceKind::Users => "/users",
            ResourceKind::Projects => "/projects",
            ResourceKind::Tasks => "/tasks",
            ResourceKind::Comments => "/comments",
            ResourceKind::CustomFields => "/custom-fields",
            ResourceKind::RecurringItems => "/recurring-items",
            ResourceKind::Schedules => "/schedules",
            ResourceKind::Statuses => "/statuses",
        }
    }

    /// Default cache TTL for this kind
    pub fn default_ttl(self) -> Duration {
        match self {
            ResourceKind::Workspaces | ResourceKind::Users => Duration::from_secs(600),
            ResourceKind::Statuses | ResourceKind::CustomFields => Duration::from_secs(300),
            ResourceKind::Projects | ResourceKind::Schedules | ResourceKind::RecurringItems => {
                Duration::from_secs(120)
            }
            ResourceKind::Tasks | ResourceKind::Comments => Duration::from_secs(30),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("unknown resource kind: {s}"))
    }
}

// ============================================================================
// Completion Policy
// ============================================================================

/// How far a missing cursor can be trusted as an end-of-data signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionPolicy {
    /// A missing cursor always means the upstream is exhausted
    #[default]
    Cursor,
    /// A short, non-empty page without a cursor may still hide more data
    Ambiguous,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}
