//! Outbound call to the upstream API.
//!
//! # Responsibilities
//! - Build the outbound header set from a fixed allow-list
//! - Re-encode the inbound body for the upstream (fresh multipart boundary)
//! - Issue the call with redirect following disabled
//!
//! # Design Decisions
//! - One client for the process lifetime, one upstream origin
//! - No retries: forwarded calls may not be idempotent
//! - Timeouts bound every call; a timeout is a connectivity failure

use axum::http::{header, HeaderMap, HeaderValue, Method};
use reqwest::multipart::{Form, Part};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};
use std::time::Duration;

use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::error::GatewayError;
use crate::http::request::{InboundBody, InboundRequest, MultipartPart};
use crate::routing::matcher::has_dot_segment;

/// Inbound headers copied verbatim to the upstream.
pub const FORWARDED_HEADERS: [header::HeaderName; 3] =
    [header::COOKIE, header::AUTHORIZATION, header::USER_AGENT];

/// Issues calls against the single upstream origin.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    base_url: String,
}

impl Forwarder {
    /// Build the forwarder and its HTTP client.
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .redirect(Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .no_proxy()
            .build()
            .map_err(GatewayError::Client)?;

        Ok(Self {
            client,
            base_url: upstream.normalized_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute upstream URL for a backend-relative path (query included).
    ///
    /// Dot segments are refused: URL parsing would resolve them and the
    /// target could leave the base path.
    pub fn target_url(&self, backend_path: &str) -> Result<Url, GatewayError> {
        let path = backend_path.split('?').next().unwrap_or_default();
        if has_dot_segment(path) {
            return Err(GatewayError::DotSegment(path.to_string()));
        }
        let target = format!("{}{}", self.base_url, backend_path);
        Url::parse(&target).map_err(|source| GatewayError::Target { target, source })
    }

    /// Send `inbound` to `backend_path` and return the raw upstream response.
    ///
    /// Any 3xx comes back as-is; nothing here follows redirects.
    pub async fn send(
        &self,
        backend_path: &str,
        inbound: InboundRequest,
    ) -> Result<reqwest::Response, GatewayError> {
        let url = self.target_url(backend_path)?;
        let headers = outbound_headers(&inbound.headers, &inbound.body);

        let mut builder = self
            .client
            .request(inbound.method.clone(), url)
            .headers(headers);

        if inbound.method != Method::GET && inbound.method != Method::HEAD {
            builder = match inbound.body {
                InboundBody::Empty => builder,
                InboundBody::Text(text) => builder.body(text),
                InboundBody::Binary(bytes) => builder.body(bytes),
                InboundBody::Multipart(parts) => builder.multipart(multipart_form(parts)?),
            };
        }

        builder.send().await.map_err(GatewayError::Upstream)
    }
}

/// Allow-listed outbound headers for `inbound`.
///
/// `content-type` is copied except for multipart bodies: the re-encoded body
/// gets a new boundary, and the client writes the matching header.
pub fn outbound_headers(inbound: &HeaderMap, body: &InboundBody) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for name in FORWARDED_HEADERS {
        if name == header::COOKIE {
            if let Some(value) = joined_cookie(inbound) {
                headers.insert(header::COOKIE, value);
            }
            continue;
        }
        for value in inbound.get_all(&name) {
            headers.append(name.clone(), value.clone());
        }
    }

    if !body.is_multipart() {
        if let Some(value) = inbound.get(header::CONTENT_TYPE) {
            headers.insert(header::CONTENT_TYPE, value.clone());
        }
    }

    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers
}

/// All inbound `Cookie` field lines as one `"; "`-joined value.
///
/// HTTP/2 clients send one field per crumb; an HTTP/1.1 upstream expects one line.
fn joined_cookie(inbound: &HeaderMap) -> Option<HeaderValue> {
    let mut joined: Vec<u8> = Vec::new();
    for value in inbound.get_all(header::COOKIE) {
        if !joined.is_empty() {
            joined.extend_from_slice(b"; ");
        }
        joined.extend_from_slice(value.as_bytes());
    }
    if joined.is_empty() {
        return None;
    }
    HeaderValue::from_bytes(&joined).ok()
}

/// Rebuild parsed parts as a new multipart form. File bytes are not touched.
pub fn multipart_form(parts: Vec<MultipartPart>) -> Result<Form, GatewayError> {
    let mut form = Form::new();
    for part in parts {
        let mut out = Part::bytes(part.data.to_vec());
        if let Some(file_name) = part.file_name {
            out = out.file_name(file_name);
        }
        if let Some(content_type) = part.content_type {
            out = out
                .mime_str(&content_type)
                .map_err(|e| GatewayError::Multipart(e.to_string()))?;
        }
        form = form.part(part.name, out);
    }
    Ok(form)
}
