//! Shared utilities for integration testing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chain_gateway::config::GatewayConfig;
use chain_gateway::lifecycle::{build_state, Subsystems};
use chain_gateway::HttpServer;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tower::ServiceExt;

/// What the mock upstream saw.
#[derive(Debug, Clone)]
pub struct MockRequest {
    pub method: String,
    pub target: String,
    pub body: Vec<u8>,
}

impl MockRequest {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl MockResponse {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
        }
    }
}

/// Start a programmable mock upstream on an ephemeral port.
pub async fn start_mock_upstream<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(MockRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockResponse> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let Some(request) = read_request(&mut socket).await else {
                            return;
                        };
                        let response = f(request).await;
                        let status_text = match response.status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            502 => "502 Bad Gateway",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            response.content_type,
                            response.body.len(),
                            response.body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Read one HTTP/1.1 request: head, then a Content-Length or chunked body.
async fn read_request(socket: &mut TcpStream) -> Option<MockRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut chunked = false;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else { continue };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();
        if name == "content-length" {
            content_length = value.parse().unwrap_or(0);
        } else if name == "transfer-encoding" && value.eq_ignore_ascii_case("chunked") {
            chunked = true;
        }
    }

    let mut body = buf[head_end..].to_vec();
    if chunked {
        while find(&body, b"0\r\n\r\n").is_none() {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
    } else {
        while body.len() < content_length {
            let n = socket.read(&mut chunk).await.ok()?;
            if n == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..n]);
        }
    }

    Some(MockRequest { method, target, body })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Defaults with an in-memory store and every upstream pointed at `upstream`.
pub fn test_config(upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.storage.database_url = "sqlite::memory:".to_string();
    config.storage.max_connections = 1;
    config.timeouts.upstream_secs = 2;
    config.explorer.base_url = format!("http://{}/api", upstream);
    config.explorer.api_key = Some("test-key".to_string());
    config.pinning.api_url = format!("http://{}/", upstream);
    config.pinning.gateway = format!("http://{}", upstream);
    config.pinning.jwt = Some("test-jwt".to_string());
    config.blockchain.rpc_url = format!("http://{}/rpc", upstream);
    config.blockchain.rpc_timeout_secs = 2;
    config
}

/// Build the full application against `config`.
pub async fn start_gateway(config: &GatewayConfig) -> (Router, Subsystems) {
    let subsystems = build_state(config).await.unwrap();
    let router = HttpServer::new(config, subsystems.state.clone()).router();
    (router, subsystems)
}

/// Send one request through the router and decode the JSON body.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_json(router: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}
