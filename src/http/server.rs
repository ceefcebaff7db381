//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router: API passthrough, health probe, page fallback
//! - Wire up middleware (request ID, tracing, security headers, body limits, session gate)
//! - Dispatch API requests through the route table to the upstream
//! - Serve plain TCP or TLS until the shutdown signal fires
//!
//! # Data Flow
//! ```text
//! Request
//!     → SetRequestId → Trace → PropagateRequestId → security headers → body limit
//!     → /healthz (ungated)
//!     → session gate
//!         → {api_prefix}/**  → api_handler → RouteTable → Forwarder → translate
//!         → anything else    → page service (404 unless one is supplied)
//! ```

use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::forwarder::Forwarder;
use crate::http::request::{request_id, InboundRequest, UuidRequestId};
use crate::http::translator::translate;
use crate::observability::metrics;
use crate::routing::{ResolvedRoute, RouteTable};
use crate::security::{apply_security_headers, SecurityHeaders};
use crate::session::{session_gate, GateState, LoggingSessionEvents, SharedSessionEvents};

/// How long in-flight TLS connections get to finish after shutdown.
const TLS_DRAIN: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub forwarder: Arc<Forwarder>,
    pub events: SharedSessionEvents,
    pub api_prefix: String,
    pub max_body_size: usize,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    config: GatewayConfig,
    state: AppState,
    pages: Router,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    ///
    /// Pages default to a bare 404 and session events to [`LoggingSessionEvents`].
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let forwarder = Forwarder::new(&config.upstream, &config.timeouts)?;
        let routes = RouteTable::default();

        tracing::info!(
            upstream = %forwarder.base_url(),
            routes = routes.routes().len(),
            api_prefix = %config.routing.api_prefix,
            "Gateway configured"
        );

        let state = AppState {
            routes: Arc::new(routes),
            forwarder: Arc::new(forwarder),
            events: Arc::new(LoggingSessionEvents),
            api_prefix: config.routing.api_prefix.trim_end_matches('/').to_string(),
            max_body_size: config.security.max_body_size,
        };

        Ok(Self {
            config,
            state,
            pages: Router::new().fallback(|| async { StatusCode::NOT_FOUND }),
        })
    }

    /// Serve everything outside the API prefix with `pages`.
    pub fn with_pages(mut self, pages: Router) -> Self {
        self.pages = pages;
        self
    }

    /// Deliver upstream 401 notifications to `events`.
    pub fn with_session_events(mut self, events: SharedSessionEvents) -> Self {
        self.state.events = events;
        self
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Build the Axum router with all middleware layers.
    pub fn router(&self) -> Router {
        let prefix = self.state.api_prefix.as_str();
        let limit = self.config.security.max_body_size;

        let gated = Router::new()
            .route(prefix, any(api_handler))
            .route(&format!("{}/", prefix), any(api_handler))
            .route(&format!("{}/{{*path}}", prefix), any(api_handler))
            .fallback_service(self.pages.clone())
            .with_state(self.state.clone())
            .layer(middleware::from_fn_with_state(
                GateState::from_config(&self.config),
                session_gate,
            ));

        let mut router = Router::new()
            .route("/healthz", get(healthz))
            .merge(gated)
            .layer(DefaultBodyLimit::max(limit))
            .layer(RequestBodyLimitLayer::new(limit));

        if self.config.security.enable_headers {
            let headers = Arc::new(SecurityHeaders::from_config(&self.config));
            router = router.layer(middleware::map_response_with_state(headers, apply_security_headers));
        }

        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server on a plain TCP listener until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Run the server with TLS termination until `shutdown` fires.
    pub async fn run_tls(
        self,
        addr: SocketAddr,
        tls: RustlsConfig,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(address = %addr, "HTTPS server starting");

        let handle = axum_server::Handle::new();
        let drain = handle.clone();
        tokio::spawn(async move {
            let _ = shutdown.recv().await;
            tracing::info!("Draining in-flight requests");
            drain.graceful_shutdown(Some(TLS_DRAIN));
        });

        let app = self.router();
        axum_server::bind_rustls(addr, tls)
            .handle(handle)
            .serve(app.into_make_service())
            .await?;

        tracing::info!("HTTPS server stopped");
        Ok(())
    }
}

/// Liveness probe. Never gated, never forwarded.
async fn healthz() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

/// API passthrough handler.
///
/// Every method and every path under the API prefix ends up here; the
/// route table always yields a target, so there is no "no route" branch.
async fn api_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);

    let public_path = path.strip_prefix(state.api_prefix.as_str()).unwrap_or(&path);
    let route = state.routes.resolve(&method, public_path, query.as_deref());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.label,
        target = %route.backend_path,
        "Proxying request"
    );

    let response = match forward(&state, &route, request).await {
        Ok(response) => response,
        Err(e) => {
            if e.status() == StatusCode::BAD_GATEWAY {
                tracing::error!(
                    request_id = %request_id,
                    method = %method,
                    target = %route.backend_path,
                    kind = e.kind(),
                    error = %e,
                    "Upstream call failed"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    error = %e,
                    "Rejected request"
                );
            }
            metrics::record_upstream_error(e.kind());
            e.into_response()
        }
    };

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        state.events.upstream_unauthorized(&path, &request_id);
    }

    metrics::record_request(method.as_str(), status.as_u16(), route.label, start);
    response
}

async fn forward(
    state: &AppState,
    route: &ResolvedRoute,
    request: Request,
) -> Result<Response, GatewayError> {
    let method = request.method().clone();
    let inbound = InboundRequest::read(request, state.max_body_size).await?;
    let upstream = state.forwarder.send(&route.backend_path, inbound).await?;
    translate(upstream, &method).await
}
