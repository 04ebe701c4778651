//! Configuration for the resilience layer
//!
//! All constants the core needs (retry budget, backoff curve, page sizes,
//! item limits, per-resource cache TTLs) live here and are loaded from YAML.
//! Every field has a default so an empty document is a valid configuration.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{CompletionPolicy, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete configuration loaded from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListguardConfig {
    /// Upstream connection settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Retry and backoff settings
    #[serde(default)]
    pub retry: RetryConfig,

    /// Page size and limit settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Per-resource cache settings
    #[serde(default)]
    pub cache: CacheConfig,
}

impl ListguardConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        self.http.validate()?;
        self.retry.validate()?;
        self.pagination.validate()?;
        Ok(())
    }
}

// ============================================================================
// HTTP
// ============================================================================

/// Upstream connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the upstream API
    #[serde(default)]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Client-side pacing of outgoing requests
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: default_timeout(),
            token: None,
            user_agent: None,
            rate_limit: None,
        }
    }
}

impl HttpConfig {
    fn validate(&self) -> Result<()> {
        if self.timeout_seconds == 0 {
            return Err(Error::invalid_config(
                "http.timeout_seconds",
                "must be greater than zero",
            ));
        }
        if let Some(base) = &self.base_url {
            url::Url::parse(base)?;
        }
        Ok(())
    }

    /// Build the transport configuration
    pub fn to_client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_seconds));
        if let Some(base) = &self.base_url {
            builder = builder.base_url(base);
        }
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        match &self.rate_limit {
            Some(limit) => builder.rate_limit(RateLimiterConfig::new(
                limit.requests_per_second,
                limit.burst_size,
            )),
            None => builder.no_rate_limit(),
        }
        .build()
    }
}

fn default_timeout() -> u64 {
    30
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Requests per second
    pub requests_per_second: u32,

    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

fn default_burst() -> u32 {
    1
}

// ============================================================================
// Retry
// ============================================================================

/// Retry and backoff settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per call, first attempt included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before the second attempt in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Growth factor between consecutive backoffs
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Upper bound of random jitter, as a fraction of the backoff
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,

    /// Cap on any computed delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            multiplier: default_multiplier(),
            jitter_factor: default_jitter_factor(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryConfig {
    fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::invalid_config(
                "retry.max_attempts",
                "must be at least 1",
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(Error::invalid_config(
                "retry.multiplier",
                "must be a finite number >= 1.0",
            ));
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err(Error::invalid_config(
                "retry.jitter_factor",
                "must be within [0, 1]",
            ));
        }
        if self.initial_backoff_ms > self.max_backoff_ms {
            return Err(Error::invalid_config(
                "retry.initial_backoff_ms",
                "must not exceed retry.max_backoff_ms",
            ));
        }
        Ok(())
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    500
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_jitter_factor() -> f64 {
    0.1
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

// ============================================================================
// Pagination
// ============================================================================

/// Page size and limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Largest page size the upstream accepts
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,

    /// Safety cap on pages per listing
    #[serde(default = "default_max_pages")]
    pub default_max_pages: u32,

    /// Items returned when the caller gives no limit
    #[serde(default = "default_item_limit")]
    pub default_item_limit: usize,

    /// Largest item limit a caller may ask for
    #[serde(default = "default_max_item_limit")]
    pub max_item_limit: usize,

    /// Trust placed in a missing cursor
    #[serde(default)]
    pub completion: CompletionPolicy,

    /// Query parameter carrying the cursor
    #[serde(default = "default_cursor_param")]
    pub cursor_param: String,

    /// Query parameter carrying the page size
    #[serde(default = "default_limit_param")]
    pub limit_param: String,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            default_max_pages: default_max_pages(),
            default_item_limit: default_item_limit(),
            max_item_limit: default_max_item_limit(),
            completion: CompletionPolicy::default(),
            cursor_param: default_cursor_param(),
            limit_param: default_limit_param(),
        }
    }
}

impl PaginationConfig {
    fn validate(&self) -> Result<()> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(Error::invalid_config(
                "pagination.default_page_size",
                "page sizes must be greater than zero",
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(Error::invalid_config(
                "pagination.default_page_size",
                "must not exceed pagination.max_page_size",
            ));
        }
        if self.default_max_pages == 0 {
            return Err(Error::invalid_config(
                "pagination.default_max_pages",
                "must be at least 1",
            ));
        }
        if self.default_item_limit == 0 || self.default_item_limit > self.max_item_limit {
            return Err(Error::invalid_config(
                "pagination.default_item_limit",
                "must be within 1..=pagination.max_item_limit",
            ));
        }
        let reachable = self
            .default_page_size
            .saturating_mul(self.default_max_pages as usize);
        if self.max_item_limit > reachable {
            return Err(Error::invalid_config(
                "pagination.max_item_limit",
                format!(
                    "{} exceeds what default_page_size * default_max_pages can fetch ({reachable})",
                    self.max_item_limit
                ),
            ));
        }
        Ok(())
    }
}

fn default_page_size() -> usize {
    50
}

fn default_max_page_size() -> usize {
    100
}

fn default_max_pages() -> u32 {
    10
}

fn default_item_limit() -> usize {
    50
}

fn default_max_item_limit() -> usize {
    500
}

fn default_cursor_param() -> String {
    "cursor".to_string()
}

fn default_limit_param() -> String {
    "limit".to_string()
}

// ============================================================================
// Cache
// ============================================================================

/// Per-resource cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether accessors cache list results at all
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,

    /// TTL overrides in seconds, keyed by resource kind
    #[serde(default)]
    pub ttls: HashMap<ResourceKind, u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttls: HashMap::new(),
        }
    }
}

impl CacheConfig {
    /// TTL for a resource kind, falling back to the kind's default
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        self.ttls
            .get(&kind)
            .map_or_else(|| kind.default_ttl(), |secs| Duration::from_secs(*secs))
    }
}

fn default_cache_enabled() -> bool {
    true
}
