//! Resource accessors
//!
//! One accessor per resource kind. Each builds page fetches for its endpoint,
//! runs them through the paginated fetcher (with retries), caches resolved
//! collections, and invalidates them when it mutates the resource.

use super::scope::Scope;
use crate::cache::{Lookup, TtlCache};
use crate::config::{ListguardConfig, PaginationConfig};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{FetchOptions, HttpPageSource, PaginatedFetcher};
use crate::retry::RetryExecutor;
use crate::truncation::{merge, ListResult};
use crate::types::{JsonValue, ResourceKind};
use futures::future::try_join_all;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Cached state of one resource kind
pub struct ResourceCache<T> {
    lists: TtlCache<String, Vec<T>>,
    records: TtlCache<String, T>,
    ttl: Duration,
}

impl<T: Clone> ResourceCache<T> {
    /// Create an empty cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            lists: TtlCache::new(),
            records: TtlCache::new(),
            ttl,
        }
    }

    /// Entry lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached listings
    pub fn lists(&self) -> &TtlCache<String, Vec<T>> {
        &self.lists
    }

    /// Cached single records
    pub fn records(&self) -> &TtlCache<String, T> {
        &self.records
    }

    /// Drop listings and records whose key contains `pattern`, or all of them
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        self.lists.invalidate(pattern) + self.records.invalidate(pattern)
    }
}

/// Entry point for one resource kind
pub struct ResourceAccessor<T> {
    kind: ResourceKind,
    client: Arc<HttpClient>,
    pagination: PaginationConfig,
    fetcher: PaginatedFetcher,
    retry: RetryExecutor,
    cache: Option<Arc<ResourceCache<T>>>,
    cancel: Option<CancellationToken>,
}

impl<T> ResourceAccessor<T>
where
    T: DeserializeOwned + Clone,
{
    /// Create an accessor; `cache` is shared with whoever else holds it
    pub fn new(
        kind: ResourceKind,
        client: Arc<HttpClient>,
        config: &ListguardConfig,
        cache: Option<Arc<ResourceCache<T>>>,
    ) -> Self {
        let retry = RetryExecutor::from_config(&config.retry);
        let fetcher = PaginatedFetcher::new(&config.pagination).with_retry(retry.clone());
        Self {
            kind,
            client,
            pagination: config.pagination.clone(),
            fetcher,
            retry,
            cache,
            cancel: None,
        }
    }

    /// Abort fetches and retries once `token` is cancelled
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Resource kind served by this accessor
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The cache, when caching is enabled
    pub fn cache(&self) -> Option<&ResourceCache<T>> {
        self.cache.as_deref()
    }

    /// List the resources in `scope`, at most `limit` of them.
    ///
    /// Every fetch is sized by the caller's limit. Only complete listings are
    /// cached; truncation is derived from the current limit on every read, so
    /// one cached collection serves any limit.
    pub async fn list(&self, scope: &Scope, limit: Option<usize>) -> Result<ListResult<T>> {
        let limit = self.resolve_limit(limit)?;

        let Some(cache) = &self.cache else {
            return self.fetch(scope, limit).await;
        };

        let key = scope.cache_key(self.kind);
        let found = cache
            .lists
            .get_or_compute(key.clone(), cache.ttl, || async move {
                let fetched = self.fetch(scope, limit).await?;
                Ok(if fetched.is_truncated() {
                    Lookup::Uncached(fetched)
                } else {
                    Lookup::Fresh(fetched.into_items())
                })
            })
            .await?;

        match found {
            Lookup::Fresh(items) => Ok(ListResult::from_collection(
                items,
                limit,
                self.pagination.default_page_size,
            )),
            Lookup::Uncached(partial) => {
                if let Some(info) = partial.truncation() {
                    debug!(key, reason = %info.reason(), "partial listing not cached");
                }
                Ok(partial)
            }
        }
    }

    /// List across several scopes concurrently, merged in `scopes` order
    pub async fn list_across(&self, scopes: &[Scope], limit: Option<usize>) -> Result<ListResult<T>> {
        let limit = self.resolve_limit(limit)?;
        let results = try_join_all(scopes.iter().map(|scope| self.list(scope, Some(limit)))).await?;
        let merged = merge(results, Some(limit));
        if let Some(info) = merged.truncation() {
            info!(
                kind = %self.kind,
                scopes = scopes.len(),
                items = info.returned_count(),
                reason = %info.reason(),
                "cross-scope listing truncated"
            );
        }
        Ok(merged)
    }

    /// Fetch one resource by id
    pub async fn get(&self, id: &str) -> Result<T> {
        let url = self.record_path(id);
        let fetch = || {
            self.with_retry(|| {
                self.client
                    .request_json::<T>(Method::GET, &url, RequestConfig::new())
            })
        };
        let Some(cache) = &self.cache else {
            return fetch().await;
        };
        let found: Lookup<T, T> = cache
            .records
            .get_or_compute(self.record_key(id), cache.ttl, || async move {
                fetch().await.map(Lookup::Fresh)
            })
            .await?;
        Ok(found.into_value())
    }

    /// Create a resource; sent once, never retried
    pub async fn create(&self, body: &JsonValue) -> Result<T> {
        let created = self
            .client
            .request_json::<T>(
                Method::POST,
                self.kind.path(),
                RequestConfig::new().json(body.clone()),
            )
            .await?;
        self.invalidate_lists();
        Ok(created)
    }

    /// Replace a resource
    pub async fn update(&self, id: &str, body: &JsonValue) -> Result<T> {
        let url = self.record_path(id);
        let updated = self
            .with_retry(|| {
                self.client.request_json::<T>(
                    Method::PUT,
                    &url,
                    RequestConfig::new().json(body.clone()),
                )
            })
            .await?;
        self.invalidate_record(id);
        Ok(updated)
    }

    /// Delete a resource
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.record_path(id);
        self.with_retry(|| self.client.request(Method::DELETE, &url, RequestConfig::new()))
            .await?;
        self.invalidate_record(id);
        Ok(())
    }

    /// Drop cached listings of one scope (and narrower scopes)
    pub fn invalidate_scope(&self, scope: &Scope) -> usize {
        self.cache
            .as_ref()
            .map_or(0, |cache| cache.lists.invalidate(Some(&scope.cache_key(self.kind))))
    }

    fn resolve_limit(&self, limit: Option<usize>) -> Result<usize> {
        let limit = limit.unwrap_or(self.pagination.default_item_limit);
        self.fetcher.plan(&FetchOptions::new().item_limit(limit))?;
        Ok(limit)
    }

    async fn fetch(&self, scope: &Scope, limit: usize) -> Result<ListResult<T>> {
        let source = scope.params().iter().fold(
            HttpPageSource::new(Arc::clone(&self.client), self.kind.path(), &self.pagination),
            |source, (key, value)| source.with_query(key, value),
        );

        let mut options = FetchOptions::new().item_limit(limit);
        if let Some(token) = &self.cancel {
            options = options.cancel_on(token.clone());
        }

        debug!(kind = %self.kind, scope = %scope, limit, "fetching listing");
        self.fetcher
            .fetch_all(|request| source.fetch_page::<T>(request), options)
            .await
    }

    async fn with_retry<R, F, Fut>(&self, call: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<R>>,
    {
        match &self.cancel {
            Some(token) => self.retry.execute_until(token, call).await,
            None => self.retry.execute(call).await,
        }
    }

    fn record_path(&self, id: &str) -> String {
        format!("{}/{id}", self.kind.path())
    }

    fn record_key(&self, id: &str) -> String {
        format!("{}:id:{id}", self.kind)
    }

    // any listing of this kind may contain the created or changed record
    fn invalidate_lists(&self) {
        if let Some(cache) = &self.cache {
            let removed = cache.lists.invalidate(Some(self.kind.as_str()));
            debug!(kind = %self.kind, removed, "listings invalidated after mutation");
        }
    }

    fn invalidate_record(&self, id: &str) {
        if let Some(cache) = &self.cache {
            cache.records.invalidate(Some(&self.record_key(id)));
        }
        self.invalidate_lists();
    }
}
