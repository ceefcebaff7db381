//! Session gate: pre-routing navigation check.
//!
//! Runs in front of every route. API and asset paths always pass. Page
//! navigation is let through, or redirected to the login page, based on a
//! local reading of the credential cookie.
//!
//! The decision is advisory only. The credential's signature is never
//! verified here, so a forged token with a future `exp` passes the gate.
//! That is acceptable because the gate only spares a round trip for
//! obviously stale sessions; every API call still reaches the backend,
//! which performs the real authorization check. Never rely on a
//! `Continue` from this module to protect data.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use url::form_urlencoded;

use crate::config::GatewayConfig;
use crate::observability::metrics;
use crate::routing::matcher::under_prefix;
use crate::session::cookie::CookiePolicy;
use crate::session::credential::{inspect, unix_now, CredentialStatus};

/// Machine-readable reason attached to a login redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Credential decoded but past its expiry and grace window.
    Expired,
    /// Credential present but unreadable.
    Invalid,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::Expired => "expired",
            RedirectReason::Invalid => "invalid",
        }
    }
}

/// Outcome of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Continue,
    Redirect {
        location: String,
        /// Delete the credential cookie alongside the redirect.
        clear_credential: bool,
    },
}

/// Path rules the gate applies.
#[derive(Debug, Clone)]
pub struct GatePolicy {
    pub api_prefix: String,
    pub login_path: String,
    pub home_path: String,
    pub public_prefixes: Vec<String>,
    pub static_prefixes: Vec<String>,
    pub static_paths: Vec<String>,
    pub grace_secs: i64,
}

impl GatePolicy {
    pub fn from_config(config: &GatewayConfig) -> Self {
        let session = &config.session;
        Self {
            api_prefix: config.routing.api_prefix.clone(),
            login_path: session.login_path.clone(),
            home_path: session.home_path.clone(),
            public_prefixes: session.public_prefixes.clone(),
            static_prefixes: session.static_prefixes.clone(),
            static_paths: session.static_paths.clone(),
            grace_secs: session.grace_secs,
        }
    }

    /// Paths the gate never looks at.
    fn is_exempt(&self, path: &str) -> bool {
        under_prefix(path, &self.api_prefix)
            || self.static_prefixes.iter().any(|p| under_prefix(path, p))
            || self.static_paths.iter().any(|p| p == path)
    }

    /// Paths reachable without a credential.
    fn is_public(&self, path: &str) -> bool {
        path == self.login_path || self.public_prefixes.iter().any(|p| under_prefix(path, p))
    }

    fn login_redirect(&self, param: &str, value: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(param, value)
            .finish();
        format!("{}?{}", self.login_path, query)
    }

    /// Decide what to do with a navigation to `path`.
    ///
    /// `credential` is the raw cookie value, if any; `now` is seconds since
    /// the epoch. Pure: no I/O, no clock access.
    pub fn evaluate(
        &self,
        path: &str,
        query: Option<&str>,
        credential: Option<&str>,
        now: i64,
    ) -> GateDecision {
        if self.is_exempt(path) {
            return GateDecision::Continue;
        }

        let Some(token) = credential.filter(|t| !t.is_empty()) else {
            if self.is_public(path) {
                return GateDecision::Continue;
            }
            let target = match query.filter(|q| !q.is_empty()) {
                Some(q) => format!("{}?{}", path, q),
                None => path.to_string(),
            };
            return GateDecision::Redirect {
                location: self.login_redirect("next", &target),
                clear_credential: false,
            };
        };

        let reason = match inspect(token, now, self.grace_secs) {
            CredentialStatus::Valid(_) => None,
            CredentialStatus::Expired(_) => Some(RedirectReason::Expired),
            CredentialStatus::Invalid(e) => {
                tracing::debug!(error = %e, "Unreadable credential cookie");
                Some(RedirectReason::Invalid)
            }
        };

        if let Some(reason) = reason {
            return GateDecision::Redirect {
                location: self.login_redirect("reason", reason.as_str()),
                clear_credential: true,
            };
        }

        if path == self.login_path {
            return GateDecision::Redirect {
                location: self.home_path.clone(),
                clear_credential: false,
            };
        }

        GateDecision::Continue
    }
}

/// State shared by the gate middleware.
#[derive(Debug, Clone)]
pub struct GateState {
    pub policy: Arc<GatePolicy>,
    pub cookie: Arc<CookiePolicy>,
}

impl GateState {
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            policy: Arc::new(GatePolicy::from_config(config)),
            cookie: Arc::new(CookiePolicy::from_config(config)),
        }
    }
}

/// Axum middleware applying [`GatePolicy::evaluate`].
///
/// Only ever redirects or passes through; it never produces an error status.
pub async fn session_gate(
    State(state): State<GateState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(str::to_string);
    let credential = jar.get(&state.cookie.name).map(|c| c.value().to_string());

    let decision = state
        .policy
        .evaluate(&path, query.as_deref(), credential.as_deref(), unix_now());

    match decision {
        GateDecision::Continue => next.run(request).await,
        GateDecision::Redirect {
            location,
            clear_credential,
        } => {
            let reason = if clear_credential { "credential" } else { "navigation" };
            tracing::debug!(path = %path, location = %location, reason, "Gate redirect");
            metrics::record_gate_redirect(reason);

            let redirect = found(&location);
            if clear_credential {
                let jar = jar.add(state.cookie.clearing_cookie());
                (jar, redirect).into_response()
            } else {
                redirect
            }
        }
    }
}

/// A `302 Found` to `location`.
fn found(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        // Locations are built from validated config and url-encoded input.
        Err(_) => (StatusCode::FOUND, [(header::LOCATION, HeaderValue::from_static("/"))]).into_response(),
    }
}
