//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use edge_gateway::config::GatewayConfig;
use edge_gateway::http::GatewayServer;
use edge_gateway::lifecycle::Shutdown;

/// A request as the upstream saw it.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

pub type CaptureLog = Arc<Mutex<Vec<Captured>>>;

/// Last captured request. Panics if the upstream was never called.
pub fn last(log: &CaptureLog) -> Captured {
    log.lock().unwrap().last().cloned().expect("upstream was not called")
}

/// Serve `router` on an ephemeral loopback port.
pub async fn start_upstream(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Upstream that records every request and answers `{"ok": true}`.
pub async fn start_capture_upstream() -> (SocketAddr, CaptureLog) {
    let log: CaptureLog = Arc::default();
    let router = Router::new().fallback(capture).with_state(log.clone());
    (start_upstream(router).await, log)
}

async fn capture(State(log): State<CaptureLog>, request: Request) -> impl IntoResponse {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    log.lock().unwrap().push(Captured {
        method: parts.method,
        uri: parts.uri.to_string(),
        headers: parts.headers,
        body,
    });
    (StatusCode::OK, Json(json!({ "ok": true })))
}

/// Start a raw backend that writes `response` verbatim to every connection.
///
/// For answers an axum handler would normalize (duplicate headers, odd bodies).
pub async fn start_raw_backend(response: String) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let response = Arc::new(response);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let response = response.clone();
                    tokio::spawn(async move {
                        let mut buf = [0u8; 8192];
                        let _ = socket.read(&mut buf).await;
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });
    addr
}

/// Gateway config pointing at `upstream`, listening on an ephemeral port.
pub fn config_for(upstream: SocketAddr) -> GatewayConfig {
    let mut config = GatewayConfig::with_upstream(format!("http://{}", upstream));
    config.listener.bind_address = "127.0.0.1:0".into();
    config.timeouts.request_secs = 5;
    config
}

/// Run `server` in the background. Dropping the returned `Shutdown` does not
/// stop it; call `trigger()`.
pub async fn start_gateway(server: GatewayServer) -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        server.run(listener, rx).await.unwrap();
    });
    (addr, shutdown, handle)
}

/// Gateway in front of `upstream` with default settings.
pub async fn gateway_for(upstream: SocketAddr) -> SocketAddr {
    let server = GatewayServer::new(config_for(upstream)).unwrap();
    start_gateway(server).await.0
}

/// Client that never follows redirects, so 302s can be asserted.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

/// Unsigned three-segment credential carrying `claims`.
pub fn token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}

/// Seconds since the epoch.
pub fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
