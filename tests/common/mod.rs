//! Shared utilities for integration tests: mock upstreams and a gateway launcher.
#![allow(dead_code)]

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::{any, post},
    Json, Router,
};
use gateway_proxy::{GatewayConfig, HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Boot a gateway on an ephemeral port pointed at `base_url`.
pub async fn start_gateway(base_url: String, timeout_ms: u64) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = base_url;
    config.upstream.request_timeout_ms = timeout_ms;

    let server = HttpServer::new(config).expect("gateway config should be valid");
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}

/// Send `raw` over a fresh connection and return the status code and body.
///
/// Bypasses client-side URL normalization so paths reach the gateway as written.
pub async fn send_raw_request(addr: SocketAddr, raw: &str) -> (u16, String) {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket.write_all(raw.as_bytes()).await.unwrap();

    let mut reply = Vec::new();
    socket.read_to_end(&mut reply).await.unwrap();
    let reply = String::from_utf8_lossy(&reply).into_owned();

    let status = reply
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .expect("reply should start with a status line");
    let body = reply
        .split_once("\r\n\r\n")
        .map(|(_, body)| body.to_string())
        .unwrap_or_default();
    (status, body)
}

/// An address nothing is listening on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

// ---------------------------------------------------------------------------
// Recording upstream (axum)
// ---------------------------------------------------------------------------

/// What the upstream saw for one call.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path and query exactly as received.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }
}

type Recorder = Arc<Mutex<Vec<RecordedRequest>>>;

/// Upstream that records every request.
///
/// - `POST /api/upload` parses multipart and echoes the parts as JSON
/// - `/api/slow` answers after one second
/// - anything else echoes the body back as `text/plain`
pub struct RecordingUpstream {
    pub addr: SocketAddr,
    requests: Recorder,
}

impl RecordingUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("upstream received no request")
    }
}

pub async fn start_recording_upstream() -> RecordingUpstream {
    let requests: Recorder = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/api/upload", post(echo_multipart))
        .route("/api/slow", any(slow))
        .fallback(echo)
        .with_state(requests.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    RecordingUpstream { addr, requests }
}

async fn echo(
    State(requests): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    requests.lock().unwrap().push(RecordedRequest {
        method,
        uri: uri.to_string(),
        headers,
        body: body.clone(),
    });
    (StatusCode::OK, [(CONTENT_TYPE, "text/plain")], body)
}

async fn slow(State(requests): State<Recorder>, method: Method, uri: Uri, headers: HeaderMap) -> &'static str {
    requests.lock().unwrap().push(RecordedRequest {
        method,
        uri: uri.to_string(),
        headers,
        body: Bytes::new(),
    });
    tokio::time::sleep(Duration::from_secs(1)).await;
    "slow"
}

async fn echo_multipart(
    State(requests): State<Recorder>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Json<serde_json::Value> {
    requests.lock().unwrap().push(RecordedRequest {
        method,
        uri: uri.to_string(),
        headers,
        body: Bytes::new(),
    });

    let mut fields = serde_json::Map::new();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_owned) {
            Some(filename) => {
                let content_type = field.content_type().map(str::to_owned);
                let data = field.bytes().await.unwrap();
                files.push(serde_json::json!({
                    "field": name,
                    "filename": filename,
                    "content_type": content_type,
                    "data": String::from_utf8_lossy(&data),
                }));
            }
            None => {
                fields.insert(name, field.text().await.unwrap().into());
            }
        }
    }

    Json(serde_json::json!({ "fields": fields, "files": files }))
}

// ---------------------------------------------------------------------------
// Raw TCP upstreams
// ---------------------------------------------------------------------------

/// A canned reply from the programmable backend.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub content_type: Option<&'static str>,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn new(status: u16, content_type: Option<&'static str>, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn to_http(&self) -> String {
        let reason = StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown");
        let content_type = self
            .content_type
            .map(|ct| format!("Content-Type: {}\r\n", ct))
            .unwrap_or_default();

        format!(
            "HTTP/1.1 {} {}\r\n{}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            reason,
            content_type,
            self.body.len(),
            self.body
        )
    }
}

async fn read_request_head(socket: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}

/// Start a backend that writes `raw` verbatim to every connection.
pub async fn start_raw_backend(raw: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let _ = socket.write_all(raw.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a simple mock backend that returns a fixed 200 body with no content type.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let reply = MockReply::new(200, None, response);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let reply = reply.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let _ = socket.write_all(reply.to_http().as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a programmable mock backend with async support.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MockReply> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            tokio::spawn(async move {
                read_request_head(&mut socket).await;
                let reply = f().await;
                tokio::time::sleep(reply.delay).await;
                let _ = socket.write_all(reply.to_http().as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}
