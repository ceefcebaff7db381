//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream origin is a usable absolute URL
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check path settings are consistent with each other
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;
use crate::routing::matcher::under_prefix;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url is required (set BACKEND_URL)")]
    MissingUpstream,

    #[error("upstream.base_url `{url}` is invalid: {reason}")]
    InvalidUpstream { url: String, reason: String },

    #[error("{field} must start with '/': `{value}`")]
    RelativePath { field: &'static str, value: String },

    #[error("session.login_path `{0}` must not live under the API prefix")]
    LoginUnderApi(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("session.grace_secs must not be negative")]
    NegativeGrace,

    #[error("{field} `{value}` is not a socket address")]
    BadAddress { field: &'static str, value: String },
}

/// Validate a loaded configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_upstream(config, &mut errors);

    let session = &config.session;
    let mut paths = vec![
        ("routing.api_prefix", &config.routing.api_prefix),
        ("session.login_path", &session.login_path),
        ("session.home_path", &session.home_path),
    ];
    paths.extend(session.public_prefixes.iter().map(|p| ("session.public_prefixes", p)));
    paths.extend(session.static_prefixes.iter().map(|p| ("session.static_prefixes", p)));
    paths.extend(session.static_paths.iter().map(|p| ("session.static_paths", p)));
    for (field, value) in paths {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field,
                value: value.clone(),
            });
        }
    }

    if under_prefix(&session.login_path, &config.routing.api_prefix) {
        errors.push(ValidationError::LoginUnderApi(session.login_path.clone()));
    }
    if session.grace_secs < 0 {
        errors.push(ValidationError::NegativeGrace);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream(config: &GatewayConfig, errors: &mut Vec<ValidationError>) {
    let raw = config.upstream.normalized_base_url();
    if raw.is_empty() {
        errors.push(ValidationError::MissingUpstream);
        return;
    }

    let invalid = |reason: &str| ValidationError::InvalidUpstream {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    match Url::parse(raw) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(invalid("scheme must be http or https"));
            }
            if url.host_str().is_none() {
                errors.push(invalid("missing host"));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(invalid("must not carry a query or fragment"));
            }
        }
        Err(e) => errors.push(invalid(&e.to_string())),
    }
}
