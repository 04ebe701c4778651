//! Tests for the HTTP transport module

use super::client::parse_retry_after;
use super::*;
use crate::error::Error;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::Method;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpClient {
    let config = HttpClientConfig::builder()
        .base_url(server.uri())
        .no_rate_limit()
        .build();
    HttpClient::with_config(config).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("listguard/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::new(5, 2))
        .header("Authorization", "Bearer t")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 2)));
    assert_eq!(
        config.default_headers.get("Authorization"),
        Some(&"Bearer t".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_parse_retry_after() {
    let mut headers = HeaderMap::new();
    assert_eq!(parse_retry_after(&headers), None);

    headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
    assert_eq!(parse_retry_after(&headers), Some(2000));

    headers.insert(
        RETRY_AFTER,
        HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
    );
    assert_eq!(parse_retry_after(&headers), None);
}

#[tokio::test]
async fn test_get_with_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("cursor", "abc"))
        .and(query_param("limit", "10"))
        .and(header("X-Request-Id", "req-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .get(
            "/tasks",
            RequestConfig::new()
                .query("cursor", "abc")
                .query("limit", "10")
                .header("X-Request-Id", "req-1"),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_default_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("Authorization", "Bearer secret")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client.get("/me", RequestConfig::new()).await.unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_rate_limited_response_carries_retry_after() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("Retry-After", "2")
                .set_body_string("slow down"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .get("/projects", RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus {
            status,
            body,
            retry_after_ms,
        } => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
            assert_eq!(retry_after_ms, Some(2000));
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_single_attempt_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("/flaky", RequestConfig::new()).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_request_json_post() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/comments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "c1",
            "text": "hello"
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created: serde_json::Value = client
        .request_json(
            Method::POST,
            "/comments",
            RequestConfig::new().json(serde_json::json!({"text": "hello"})),
        )
        .await
        .unwrap();

    assert_eq!(created["id"], "c1");
}

#[tokio::test]
async fn test_request_json_rejects_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .request_json::<serde_json::Value>(Method::GET, "/broken", RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_absolute_url_bypasses_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/absolute"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url("https://unused.example.com")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let response = client
        .get(&format!("{}/absolute", mock_server.uri()), RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 204);
}
