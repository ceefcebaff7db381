//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// The single upstream API the gateway forwards to.
    pub upstream: UpstreamConfig,

    /// Public path layout.
    pub routing: RoutingConfig,

    /// Session gate and credential cookie settings.
    pub session: SessionConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend API (e.g., "http://backend:3001").
    /// Overridden by the `BACKEND_URL` environment variable.
    pub base_url: String,
}

impl UpstreamConfig {
    /// Base URL with trailing slashes removed, ready for path concatenation.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Public path layout.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Prefix under which the backend API is exposed.
    pub api_prefix: String,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
        }
    }
}

/// `SameSite` attribute for the credential cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// Session gate configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the credential.
    pub cookie_name: String,

    /// Login page. Unauthenticated navigation is redirected here.
    pub login_path: String,

    /// Landing page for already-authenticated visitors of the login page.
    pub home_path: String,

    /// Path prefixes reachable without a credential.
    pub public_prefixes: Vec<String>,

    /// Prefixes served by the asset server, never gated.
    pub static_prefixes: Vec<String>,

    /// Exact asset paths, never gated.
    pub static_paths: Vec<String>,

    /// Seconds past `exp` still tolerated before the gate acts.
    pub grace_secs: i64,

    /// `HttpOnly` attribute on the credential cookie.
    pub http_only: bool,

    /// `Secure` attribute. Unset means "secure when the listener terminates TLS".
    pub secure: Option<bool>,

    /// `SameSite` attribute.
    pub same_site: SameSitePolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "jwt".to_string(),
            login_path: "/login".to_string(),
            home_path: "/".to_string(),
            public_prefixes: vec!["/public".to_string()],
            static_prefixes: vec!["/_next".to_string(), "/assets".to_string()],
            static_paths: vec!["/favicon.ico".to_string()],
            grace_secs: 60,
            http_only: true,
            secure: None,
            same_site: SameSitePolicy::Strict,
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum inbound body size in bytes (document uploads included).
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 25 * 1024 * 1024, // 25MB
        }
    }
}

impl GatewayConfig {
    /// Config with every default and the given upstream.
    pub fn with_upstream(base_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.upstream.base_url = base_url.into();
        config
    }

    /// Whether the credential cookie carries `Secure`.
    pub fn secure_cookies(&self) -> bool {
        self.session.secure.unwrap_or(self.listener.tls.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://backend:3001/"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.normalized_base_url(), "http://backend:3001");
        assert_eq!(config.session.cookie_name, "jwt");
        assert_eq!(config.session.grace_secs, 60);
        assert_eq!(config.routing.api_prefix, "/api");
        assert!(config.session.http_only);
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_secure_follows_tls_unless_overridden() {
        let mut config = GatewayConfig::with_upstream("http://backend");
        config.listener.tls = Some(TlsConfig {
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
        });
        assert!(config.secure_cookies());

        config.session.secure = Some(false);
        assert!(!config.secure_cookies());
    }

    #[test]
    fn test_same_site_parses_lowercase() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [session]
            same_site = "lax"
            "#,
        )
        .unwrap();
        assert_eq!(config.session.same_site, SameSitePolicy::Lax);
    }
}
