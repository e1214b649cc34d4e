// tests/integration/fetch_test.rs

//! Integration tests for the HTTP fetcher against a local listener.
//! Tests: status passthrough, empty bodies, refused connections, timeouts, request headers.

use super::test_helpers::init_tracing;
use std::time::Duration;
use styla_seo::config::FetchConfig;
use styla_seo::core::StylaError;
use styla_seo::core::fetch::{Fetcher, HttpFetcher};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Accepts one connection, answers it with `response` after `delay`, and returns the
/// raw request it received.
async fn serve_once(response: &'static str, delay: Duration) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut chunk = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&chunk[..n]);
        }
        tokio::time::sleep(delay).await;
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}/clients/acme?url=spring"), handle)
}

fn new_fetcher() -> HttpFetcher {
    init_tracing();
    HttpFetcher::new(&FetchConfig::default()).unwrap()
}

#[tokio::test]
async fn test_error_status_body_is_returned() {
    let (url, server) = serve_once(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Type: application/json\r\nContent-Length: 12\r\nConnection: close\r\n\r\n{\"status\":5}",
        Duration::ZERO,
    )
    .await;

    let body = new_fetcher().fetch(&url).await;

    assert_eq!(body, Ok("{\"status\":5}".to_string()));
    server.await.unwrap();
}

#[tokio::test]
async fn test_empty_body_is_a_failure() {
    let (url, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        Duration::ZERO,
    )
    .await;

    let result = new_fetcher().fetch(&url).await;

    assert_eq!(result, Err(StylaError::EmptyBody(url)));
    server.await.unwrap();
}

#[tokio::test]
async fn test_refused_connection_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = new_fetcher()
        .fetch(&format!("http://{addr}/clients/acme"))
        .await
        .unwrap_err();

    assert!(matches!(err, StylaError::HttpClientError(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let (url, _server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        Duration::from_secs(5),
    )
    .await;
    let config = FetchConfig {
        timeout_seconds: 1,
        ..FetchConfig::default()
    };

    let err = HttpFetcher::new(&config).unwrap().fetch(&url).await.unwrap_err();

    assert!(matches!(err, StylaError::Timeout(_)));
}

#[tokio::test]
async fn test_request_identifies_caller_and_closes_connection() {
    let (url, server) = serve_once(
        "HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
        Duration::ZERO,
    )
    .await;

    new_fetcher().fetch(&url).await.unwrap();
    let request = server.await.unwrap().to_ascii_lowercase();

    assert!(request.starts_with("get /clients/acme?url=spring http/1.1\r\n"));
    assert!(request.contains("user-agent: oxid styla seo module\r\n"));
    assert!(request.contains("connection: close\r\n"));
}
