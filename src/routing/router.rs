//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Resolve an inbound method + path to a backend-relative target
//! - Fall back to verbatim passthrough for anything unmapped
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) pattern scan (acceptable for the table size)
//! - More literal segments win over parameters, then table order

use axum::http::Method;

use crate::routing::matcher::PathPattern;
use crate::routing::table::{QueryPolicy, RouteSpec, ROUTES};

/// Label used for requests served by the passthrough entry.
pub const CATCH_ALL: &str = "catch-all";

/// A compiled table entry.
#[derive(Debug, Clone)]
pub struct CompiledRoute {
    pub method: Method,
    pub public: PathPattern,
    pub backend: PathPattern,
    pub query: QueryPolicy,
    pub label: &'static str,
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Public pattern that matched, or [`CATCH_ALL`].
    pub label: &'static str,
    /// Backend-relative path, query included when forwarded.
    pub backend_path: String,
}

/// Maps public API paths onto backend paths.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compile a table from specs.
    pub fn from_specs(specs: &[RouteSpec]) -> Self {
        let mut routes: Vec<CompiledRoute> = specs
            .iter()
            .map(|spec| CompiledRoute {
                method: spec.method(),
                public: PathPattern::parse(spec.public),
                backend: PathPattern::parse(spec.backend),
                query: spec.query,
                label: spec.public,
            })
            .collect();

        // Stable: equal specificity keeps table order.
        routes.sort_by(|a, b| b.public.specificity().cmp(&a.public.specificity()));

        tracing::debug!(routes = routes.len(), "Route table compiled");
        Self { routes }
    }

    /// Compiled routes in match order.
    pub fn routes(&self) -> &[CompiledRoute] {
        &self.routes
    }

    /// Resolve `path` (already stripped of the API prefix).
    ///
    /// Always returns a target: unmapped requests fall through to the
    /// catch-all, which keeps the full path and query untouched.
    pub fn resolve(&self, method: &Method, path: &str, query: Option<&str>) -> ResolvedRoute {
        for route in &self.routes {
            if route.method != *method {
                continue;
            }
            if let Some(params) = route.public.matches(path) {
                let mut backend_path = route.backend.render(&params);
                if route.query == QueryPolicy::Forward {
                    append_query(&mut backend_path, query);
                }
                return ResolvedRoute {
                    label: route.label,
                    backend_path,
                };
            }
        }

        let mut backend_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        append_query(&mut backend_path, query);
        ResolvedRoute {
            label: CATCH_ALL,
            backend_path,
        }
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::from_specs(ROUTES)
    }
}

fn append_query(path: &mut String, query: Option<&str>) {
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        path.push('?');
        path.push_str(q);
    }
}
