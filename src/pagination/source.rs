//! HTTP-backed page source
//!
//! Turns a `PageRequest` into one GET against a list endpoint and unwraps the
//! body into a `PageResponse`.

use super::types::{PageRequest, PageResponse, ResponseShape};
use crate::config::PaginationConfig;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Page fetcher for one list endpoint
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Arc<HttpClient>,
    path: String,
    query: Vec<(String, String)>,
    cursor_param: String,
    limit_param: String,
}

impl HttpPageSource {
    /// Create a source for `path`, using the configured parameter names
    pub fn new(client: Arc<HttpClient>, path: impl Into<String>, config: &PaginationConfig) -> Self {
        Self {
            client,
            path: path.into(),
            query: Vec::new(),
            cursor_param: config.cursor_param.clone(),
            limit_param: config.limit_param.clone(),
        }
    }

    /// Add a fixed query parameter sent with every page
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Fetch one page (single attempt)
    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        request: PageRequest,
    ) -> Result<PageResponse<T>> {
        let mut config = RequestConfig::new();
        for (key, value) in &self.query {
            config = config.query(key, value);
        }
        config = config.query(&self.limit_param, request.page_size.to_string());
        if let Some(cursor) = request.cursor {
            config = config.query(&self.cursor_param, cursor);
        }

        let shape: ResponseShape<T> = self
            .client
            .request_json(Method::GET, &self.path, config)
            .await?;
        Ok(shape.into())
    }
}
