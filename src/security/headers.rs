//! Security response headers.
//!
//! # Responsibilities
//! - Add browser hardening headers to every gateway response
//! - Build a Content-Security-Policy that allows calls to the upstream origin
//!
//! # Design Decisions
//! - Headers already set by a handler or the upstream are left alone
//! - The header set is computed once at startup

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue},
    response::Response,
};
use std::sync::Arc;

use crate::config::GatewayConfig;

/// Precomputed header set.
#[derive(Debug, Clone, Default)]
pub struct SecurityHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl SecurityHeaders {
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut headers = vec![
            ("x-content-type-options", "nosniff".to_string()),
            ("x-frame-options", "DENY".to_string()),
            ("x-xss-protection", "1; mode=block".to_string()),
            ("referrer-policy", "strict-origin-when-cross-origin".to_string()),
            (
                "permissions-policy",
                "camera=(), microphone=(), geolocation=(), interest-cohort=()".to_string(),
            ),
            (
                "strict-transport-security",
                "max-age=31536000; includeSubDomains".to_string(),
            ),
        ];
        headers.push((
            "content-security-policy",
            content_security_policy(&upstream_origin(config)),
        ));

        let headers = headers
            .into_iter()
            .filter_map(|(name, value)| {
                let value = HeaderValue::from_str(&value).ok()?;
                Some((HeaderName::from_static(name), value))
            })
            .collect();

        Self { headers }
    }

    pub fn iter(&self) -> impl Iterator<Item = &(HeaderName, HeaderValue)> {
        self.headers.iter()
    }
}

/// `scheme://host[:port]` of the upstream, used in `connect-src`.
fn upstream_origin(config: &GatewayConfig) -> String {
    url::Url::parse(config.upstream.normalized_base_url())
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_default()
}

fn content_security_policy(upstream_origin: &str) -> String {
    [
        "default-src 'self'".to_string(),
        "script-src 'self' 'unsafe-inline' 'unsafe-eval'".to_string(),
        "style-src 'self' 'unsafe-inline'".to_string(),
        "img-src 'self' data: https://images.unsplash.com".to_string(),
        "font-src 'self' data:".to_string(),
        format!("connect-src 'self' {}", upstream_origin).trim_end().to_string(),
        "frame-ancestors 'none'".to_string(),
        "base-uri 'self'".to_string(),
        "form-action 'self'".to_string(),
    ]
    .join("; ")
}

/// `map_response` middleware inserting missing security headers.
pub async fn apply_security_headers(
    State(headers): State<Arc<SecurityHeaders>>,
    mut response: Response,
) -> Response {
    let out = response.headers_mut();
    for (name, value) in headers.iter() {
        if !out.contains_key(name) {
            out.insert(name.clone(), value.clone());
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn test_csp_names_upstream_origin() {
        let config = GatewayConfig::with_upstream("https://api.example.com:8443/v1/");
        let headers = SecurityHeaders::from_config(&config);
        let csp = headers
            .iter()
            .find(|(name, _)| name == "content-security-policy")
            .map(|(_, value)| value.to_str().unwrap().to_string())
            .unwrap();
        assert!(csp.contains("connect-src 'self' https://api.example.com:8443;"), "{}", csp);
        assert_eq!(headers.iter().count(), 7);
    }

    #[tokio::test]
    async fn test_existing_headers_are_kept() {
        let state = Arc::new(SecurityHeaders::from_config(&GatewayConfig::with_upstream(
            "http://backend",
        )));
        let app = Router::new()
            .route("/", get(|| async { ([("x-frame-options", "SAMEORIGIN")], "ok") }))
            .layer(middleware::map_response_with_state(state, apply_security_headers));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.headers()["x-frame-options"], "SAMEORIGIN");
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }
}
