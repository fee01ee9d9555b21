//! Integration tests for the fetcher
//!
//! These tests check how responses, statuses and timeouts are classified.

use shelfscan::config::UserAgentConfig;
use shelfscan::crawler::{build_http_client, check_liveness, fetch, FetchError};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_client() -> reqwest::Client {
    build_http_client(&UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: "https://example.com/contact".to_string(),
        contact_email: "test@example.com".to_string(),
    })
    .expect("Failed to build client")
}

#[tokio::test]
async fn test_fetch_success_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/page"))
        .and(header(
            "user-agent",
            "TestBot/1.0.0 (+https://example.com/contact; test@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let client = create_client();
    let url = format!("{}/page", server.uri());
    let page = fetch(&client, &url, Duration::from_secs(1))
        .await
        .expect("Fetch failed");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<html>ok</html>");
    assert_eq!(page.url, url);
    assert!(!page.is_blank());
}

#[tokio::test]
async fn test_fetch_not_found_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let client = create_client();
    let result = fetch(
        &client,
        &format!("{}/missing", server.uri()),
        Duration::from_secs(1),
    )
    .await;

    assert_eq!(result.unwrap_err(), FetchError::HttpError(404));
}

#[tokio::test]
async fn test_fetch_server_error_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = create_client();
    let result = fetch(&client, &server.uri(), Duration::from_secs(1)).await;

    assert_eq!(result.unwrap_err().status_code(), Some(503));
}

#[tokio::test]
async fn test_fetch_timeout_is_unreachable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("late")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = create_client();
    let result = fetch(
        &client,
        &format!("{}/slow", server.uri()),
        Duration::from_millis(200),
    )
    .await;

    assert!(matches!(result, Err(FetchError::Unreachable(_))));
}

#[tokio::test]
async fn test_fetch_connection_refused_is_unreachable() {
    let client = create_client();
    let result = fetch(&client, "http://127.0.0.1:9/", Duration::from_millis(500)).await;

    assert!(matches!(result, Err(FetchError::Unreachable(_))));
}

#[tokio::test]
async fn test_fetch_empty_body_is_blank() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = create_client();
    let page = fetch(&client, &server.uri(), Duration::from_secs(1))
        .await
        .expect("Fetch failed");

    assert!(page.is_blank());
}

#[tokio::test]
async fn test_liveness_probe() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("home"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/down/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = create_client();
    let timeout = Duration::from_secs(1);

    assert!(check_liveness(&client, &format!("{}/", server.uri()), timeout).await);
    assert!(!check_liveness(&client, &format!("{}/down/", server.uri()), timeout).await);
}
