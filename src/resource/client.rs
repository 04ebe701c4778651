//! Accessor factory
//!
//! Owns the shared HTTP client and configuration and hands out one accessor
//! per resource kind. An accessor's cache lives as long as the accessor, so
//! callers keep accessors around rather than building them per call.

use super::accessor::{ResourceAccessor, ResourceCache};
use crate::config::ListguardConfig;
use crate::error::Result;
use crate::http::HttpClient;
use crate::types::ResourceKind;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Builds resource accessors over one upstream connection
#[derive(Debug, Clone)]
pub struct ResourceClient {
    client: Arc<HttpClient>,
    config: ListguardConfig,
}

impl ResourceClient {
    /// Validate `config` and open the upstream connection
    pub fn new(config: ListguardConfig) -> Result<Self> {
        config.validate()?;
        let client = HttpClient::with_config(config.http.to_client_config())?;
        Ok(Self::from_parts(Arc::new(client), config))
    }

    /// Use an existing HTTP client
    pub fn from_parts(client: Arc<HttpClient>, config: ListguardConfig) -> Self {
        Self { client, config }
    }

    /// The effective configuration
    pub fn config(&self) -> &ListguardConfig {
        &self.config
    }

    /// Accessor for `kind` with its own cache (when caching is enabled)
    pub fn accessor<T>(&self, kind: ResourceKind) -> ResourceAccessor<T>
    where
        T: DeserializeOwned + Clone,
    {
        let cache = self
            .config
            .cache
            .enabled
            .then(|| Arc::new(ResourceCache::new(self.config.cache.ttl_for(kind))));
        self.accessor_with_cache(kind, cache)
    }

    /// Accessor for `kind` sharing an existing cache
    pub fn accessor_with_cache<T>(
        &self,
        kind: ResourceKind,
        cache: Option<Arc<ResourceCache<T>>>,
    ) -> ResourceAccessor<T>
    where
        T: DeserializeOwned + Clone,
    {
        ResourceAccessor::new(kind, Arc::clone(&self.client), &self.config, cache)
    }
}
