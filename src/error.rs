//! Errors produced while handling a proxied request.
//!
//! Every variant renders as a JSON envelope with an `error` field, so the
//! calling screen always receives a parseable body even when the upstream
//! never answered.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to callers when the upstream cannot be reached.
pub const UPSTREAM_UNREACHABLE: &str = "upstream connection failed";

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connect, DNS, timeout or transport failure talking to the upstream.
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The upstream answered but its body could not be read.
    #[error("failed to read upstream body: {0}")]
    UpstreamBody(#[source] reqwest::Error),

    /// The inbound body could not be read (too large, connection dropped).
    #[error("failed to read request body: {0}")]
    RequestBody(String),

    /// The inbound multipart body is malformed.
    #[error("invalid multipart body: {0}")]
    Multipart(String),

    /// The resolved backend path does not form a valid URL.
    #[error("invalid upstream target `{target}`: {source}")]
    Target {
        target: String,
        #[source]
        source: url::ParseError,
    },

    /// The backend path has `.` or `..` segments.
    #[error("path `{0}` contains dot segments")]
    DotSegment(String),

    /// The upstream HTTP client could not be constructed.
    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(_) | GatewayError::UpstreamBody(_) | GatewayError::Client(_) => {
                StatusCode::BAD_GATEWAY
            }
            GatewayError::RequestBody(_)
            | GatewayError::Multipart(_)
            | GatewayError::Target { .. }
            | GatewayError::DotSegment(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }

    /// Metric label.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Upstream(e) if e.is_timeout() => "timeout",
            GatewayError::Upstream(e) if e.is_connect() => "connect",
            GatewayError::Upstream(_) => "transport",
            GatewayError::UpstreamBody(_) => "body",
            GatewayError::RequestBody(_) => "request_body",
            GatewayError::Multipart(_) => "multipart",
            GatewayError::Target { .. } | GatewayError::DotSegment(_) => "target",
            GatewayError::Client(_) => "client",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = if status == StatusCode::BAD_GATEWAY {
            UPSTREAM_UNREACHABLE.to_string()
        } else {
            "invalid request".to_string()
        };
        let body = json!({ "error": error, "details": self.to_string() });
        (status, Json(body)).into_response()
    }
}
