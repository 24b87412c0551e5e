//! End-to-end tests through the reqwest transport against a wiremock server.

use serde_json::json;
use snapapi::{
    Client, Error, ExtractFormat, ExtractOptions, ImageFormat, ScreenshotOptions, Verb,
};
use std::time::Duration;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::builder("sk_test_mock")
        .base_url(server.uri())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_screenshot_binary_roundtrip() {
    let mock_server = MockServer::start().await;
    let png = vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0xff];

    Mock::given(method("POST"))
        .and(path("/v1/screenshot"))
        .and(header("x-api-key", "sk_test_mock"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"url": "https://example.com", "format": "png"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(png.clone())
                .insert_header("Content-Type", "image/png"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let out = client
        .screenshot(ScreenshotOptions {
            url: Some("https://example.com".into()),
            format: Some(ImageFormat::Png),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(out.into_bytes(), png);
}

#[tokio::test]
async fn test_extract_returns_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/extract"))
        .and(body_json(json!({"url": "https://example.com", "format": "markdown"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "url": "https://example.com",
            "content": "# Example Domain",
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let value = client
        .extract(ExtractOptions {
            url: "https://example.com".into(),
            format: Some(ExtractFormat::Markdown),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(value["content"], "# Example Domain");
}

#[tokio::test]
async fn test_usage_over_get_without_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "used": 42,
            "limit": 1000,
            "remaining": 958,
            "resetAt": "2026-11-01T00:00:00Z",
        })))
        .mount(&mock_server)
        .await;

    // trailing slash on the configured base URL must not produce `//v1/usage`
    let client = Client::builder("sk_test_mock")
        .base_url(format!("{}/", mock_server.uri()))
        .build()
        .unwrap();
    let usage = client.get_usage().await.unwrap();

    assert_eq!(usage.used(), Some(42.0));
    assert_eq!(usage.remaining(), Some(958.0));
    assert_eq!(usage.reset_at(), Some("2026-11-01T00:00:00Z"));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
    assert!(requests[0]
        .headers
        .get("user-agent")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("snapapi-rust/"));
}

#[tokio::test]
async fn test_api_error_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/screenshot/batch/unknown"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "not found", "code": "NOT_FOUND"}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_batch_status("unknown").await.unwrap_err();

    assert!(matches!(err, Error::Api(_)));
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(err.message(), "not found");
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn test_redirects_are_not_followed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/moved"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}/v1/elsewhere", mock_server.uri()))
                .set_body_string("moved"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(any())
        .and(path("/v1/elsewhere"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let body = client
        .executor()
        .execute(Verb::Get, "/v1/moved", None)
        .await
        .unwrap();

    assert_eq!(body, b"moved");
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/capabilities"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get_capabilities().await.unwrap_err();

    assert_eq!(err.code(), "HTTP_ERROR");
    assert_eq!(err.message(), "HTTP 503");
    assert_eq!(err.status(), 503);
}

#[tokio::test]
async fn test_validation_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .screenshot(ScreenshotOptions {
            format: Some(ImageFormat::Webp),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/ping"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder("sk_test_mock")
        .base_url(mock_server.uri())
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let err = client.ping().await.unwrap_err();

    assert!(err.is_connection());
    assert_eq!(err.status(), 0);
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    let client = Client::builder("sk_test_mock")
        .base_url("http://127.0.0.1:1")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();

    let err = client.get_devices().await.unwrap_err();

    assert_eq!(err.code(), "CONNECTION_ERROR");
    assert_eq!(err.status(), 0);
    assert!(!err.message().is_empty());
}
