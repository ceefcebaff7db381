//! Upstream response translation.
//!
//! # Responsibilities
//! - Re-emit the upstream status exactly
//! - Forward every `Set-Cookie` as its own header
//! - Branch on content-type: JSON re-encoded, binary and text copied
//!
//! # Design Decisions
//! - Only an allow-list of upstream headers reaches the caller
//! - JSON is structurally preserved, not byte-for-byte
//! - 3xx responses keep their `Location` so passed-through redirects work

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method, StatusCode},
    response::Response,
};
use serde_json::Value;

use crate::error::GatewayError;

/// How an upstream body is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Json,
    Binary,
    Text,
}

impl ResponseKind {
    /// Classify an upstream `content-type`.
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(ct) = content_type.map(str::to_ascii_lowercase) else {
            return ResponseKind::Text;
        };
        if ct.contains("application/json") {
            ResponseKind::Json
        } else if ct.contains("application/vnd.openxmlformats")
            || ct.contains("application/octet-stream")
            || ct.contains("application/pdf")
        {
            ResponseKind::Binary
        } else {
            ResponseKind::Text
        }
    }
}

/// Translate an upstream response for the original caller.
pub async fn translate(upstream: reqwest::Response, method: &Method) -> Result<Response, GatewayError> {
    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let content_type = upstream_headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let kind = ResponseKind::classify(content_type);

    if status.is_client_error() || status.is_server_error() {
        tracing::debug!(status = %status, headers = ?upstream_headers, "Upstream error response");
    }

    let bytes = upstream.bytes().await.map_err(GatewayError::UpstreamBody)?;
    let body = translate_body(kind, status, bytes);

    let mut response = Response::new(if method == Method::HEAD {
        Body::empty()
    } else {
        Body::from(body)
    });
    *response.status_mut() = status;
    copy_headers(&upstream_headers, kind, response.headers_mut());
    Ok(response)
}

/// Produce the outbound body bytes for `kind`.
pub fn translate_body(kind: ResponseKind, status: StatusCode, bytes: Bytes) -> Bytes {
    if kind != ResponseKind::Json || bytes.is_empty() {
        return bytes;
    }

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) => {
            if status.is_client_error() || status.is_server_error() {
                tracing::debug!(status = %status, body = %value, "Upstream error body");
            }
            match serde_json::to_vec(&value) {
                Ok(encoded) => Bytes::from(encoded),
                Err(_) => bytes,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, status = %status, "Upstream sent invalid JSON, relaying as-is");
            bytes
        }
    }
}

/// Copy the headers the caller is allowed to see.
pub fn copy_headers(upstream: &HeaderMap, kind: ResponseKind, out: &mut HeaderMap) {
    // get_all keeps every Set-Cookie separate; append never joins them.
    for cookie in upstream.get_all(header::SET_COOKIE) {
        out.append(header::SET_COOKIE, cookie.clone());
    }

    if let Some(ct) = upstream.get(header::CONTENT_TYPE) {
        out.insert(header::CONTENT_TYPE, ct.clone());
    }

    if kind == ResponseKind::Binary {
        if let Some(cd) = upstream.get(header::CONTENT_DISPOSITION) {
            out.insert(header::CONTENT_DISPOSITION, cd.clone());
        }
    }

    if let Some(location) = upstream.get(header::LOCATION) {
        out.insert(header::LOCATION, location.clone());
    }
}
