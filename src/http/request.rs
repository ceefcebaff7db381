//! Inbound request model.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4)
//! - Read the inbound body into a typed variant chosen by content-type
//! - Parse multipart bodies into named parts
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Bodies are never untyped blobs: Empty | Text | Binary | Multipart
//! - GET and HEAD never carry a body upstream, whatever the caller sent

use axum::{
    body::{to_bytes, Bytes},
    extract::{FromRequest, Multipart, Request},
    http::{header, HeaderMap, HeaderValue, Method},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::GatewayError;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates `x-request-id` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID from headers, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// One named part of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Inbound body, typed by content-type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundBody {
    Empty,
    Text(String),
    Binary(Bytes),
    Multipart(Vec<MultipartPart>),
}

impl InboundBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, InboundBody::Multipart(_))
    }

    /// Classify a raw, non-multipart body.
    pub fn from_bytes(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            return InboundBody::Empty;
        }
        match std::str::from_utf8(&bytes) {
            Ok(text) => InboundBody::Text(text.to_owned()),
            Err(_) => InboundBody::Binary(bytes),
        }
    }
}

/// A fully read inbound request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: InboundBody,
}

impl InboundRequest {
    /// Read `request`, buffering at most `limit` body bytes.
    pub async fn read(request: Request, limit: usize) -> Result<Self, GatewayError> {
        let method = request.method().clone();
        let path = request.uri().path().to_string();
        let query = request.uri().query().map(str::to_string);
        let headers = request.headers().clone();

        let body = if method == Method::GET || method == Method::HEAD {
            InboundBody::Empty
        } else if is_multipart(&headers) {
            read_multipart(request).await?
        } else {
            let bytes = to_bytes(request.into_body(), limit)
                .await
                .map_err(|e| GatewayError::RequestBody(e.to_string()))?;
            InboundBody::from_bytes(bytes)
        };

        Ok(Self {
            method,
            path,
            query,
            headers,
            body,
        })
    }
}

/// Whether the headers announce a `multipart/form-data` body.
pub fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

async fn read_multipart(request: Request) -> Result<InboundBody, GatewayError> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| GatewayError::Multipart(e.body_text()))?;

    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GatewayError::Multipart(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| GatewayError::Multipart(e.to_string()))?;

        parts.push(MultipartPart {
            name,
            file_name,
            content_type,
            data,
        });
    }

    Ok(InboundBody::Multipart(parts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request(method: Method, content_type: &str, body: impl Into<Body>) -> Request {
        axum::http::Request::builder()
            .method(method)
            .uri("/api/document/42/upload?x=1")
            .header(header::CONTENT_TYPE, content_type)
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn test_json_body_is_text() {
        let req = request(Method::POST, "application/json", r#"{"nom":"ACME"}"#);
        let inbound = InboundRequest::read(req, 1024).await.unwrap();
        assert_eq!(inbound.body, InboundBody::Text(r#"{"nom":"ACME"}"#.into()));
        assert_eq!(inbound.query.as_deref(), Some("x=1"));
    }

    #[tokio::test]
    async fn test_get_body_is_ignored() {
        let req = request(Method::GET, "text/plain", "ignored");
        let inbound = InboundRequest::read(req, 1024).await.unwrap();
        assert_eq!(inbound.body, InboundBody::Empty);
    }

    #[tokio::test]
    async fn test_non_utf8_body_is_binary() {
        let bytes = vec![0xff, 0xfe, 0x00, 0x01];
        let req = request(Method::PATCH, "application/octet-stream", bytes.clone());
        let inbound = InboundRequest::read(req, 1024).await.unwrap();
        assert_eq!(inbound.body, InboundBody::Binary(Bytes::from(bytes)));
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let req = request(Method::POST, "text/plain", "x".repeat(64));
        let err = InboundRequest::read(req, 16).await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestBody(_)));
    }

    #[tokio::test]
    async fn test_multipart_parts_are_parsed() {
        let body = "--XYZ\r\n\
            Content-Disposition: form-data; name=\"file\"; filename=\"kbis.pdf\"\r\n\
            Content-Type: application/pdf\r\n\r\n\
            %PDF-1.4 bytes\r\n\
            --XYZ\r\n\
            Content-Disposition: form-data; name=\"type\"\r\n\r\n\
            KBIS\r\n\
            --XYZ--\r\n";
        let req = request(Method::POST, "multipart/form-data; boundary=XYZ", body);
        let inbound = InboundRequest::read(req, 1024).await.unwrap();

        let InboundBody::Multipart(parts) = inbound.body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "file");
        assert_eq!(parts[0].file_name.as_deref(), Some("kbis.pdf"));
        assert_eq!(parts[0].content_type.as_deref(), Some("application/pdf"));
        assert_eq!(&parts[0].data[..], b"%PDF-1.4 bytes");
        assert_eq!(parts[1].name, "type");
        assert_eq!(&parts[1].data[..], b"KBIS");
    }

    #[tokio::test]
    async fn test_malformed_multipart_is_rejected() {
        let req = request(Method::POST, "multipart/form-data", "no boundary here");
        let err = InboundRequest::read(req, 1024).await.unwrap_err();
        assert!(matches!(err, GatewayError::Multipart(_)));
    }
}
