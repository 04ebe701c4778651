//! HTTP transport module
//!
//! One request per call, with failure classification and optional
//! client-side pacing.
//!
//! # Features
//!
//! - **Status Classification**: non-2xx responses become `Error::HttpStatus`
//! - **Retry-After Capture**: integer-seconds hints travel with the error
//! - **Rate Limiting**: Token bucket rate limiter using governor

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
