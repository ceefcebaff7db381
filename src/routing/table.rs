//! Static route table for the backend API.
//!
//! Public paths are relative to the API prefix. Every entry maps 1:1 onto the
//! backend's own path shape; the only rewrite is `GET /societe`, which the
//! backend serves at `/societe/`.

use axum::http::Method;

/// Whether the caller's query string travels with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPolicy {
    /// Append the inbound query string verbatim.
    Forward,
    /// Call the backend without a query string.
    Drop,
}

/// One `(method, public pattern) → backend pattern` entry.
#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub method: &'static str,
    pub public: &'static str,
    pub backend: &'static str,
    pub query: QueryPolicy,
}

const fn route(method: &'static str, public: &'static str, backend: &'static str) -> RouteSpec {
    RouteSpec {
        method,
        public,
        backend,
        query: QueryPolicy::Drop,
    }
}

const fn route_q(method: &'static str, public: &'static str, backend: &'static str) -> RouteSpec {
    RouteSpec {
        method,
        public,
        backend,
        query: QueryPolicy::Forward,
    }
}

pub const ROUTES: &[RouteSpec] = &[
    // activite
    route("GET", "/activite", "/activite"),
    route("POST", "/activite", "/activite"),
    route("GET", "/activite/{id}", "/activite/{id}"),
    route("PATCH", "/activite/{id}", "/activite/{id}"),
    route("DELETE", "/activite/{id}", "/activite/{id}"),
    // auth
    route("POST", "/auth/login", "/auth/login"),
    route("GET", "/auth/whoIAm", "/auth/whoIAm"),
    // cabinet
    route("GET", "/cabinet", "/cabinet"),
    // canal / messages
    route("GET", "/canal/{canalId}/messages", "/canal/{canalId}/messages"),
    route("POST", "/message/canal/{canalId}", "/message/canal/{canalId}"),
    // commentaire
    route("POST", "/commentaire/{missionId}", "/commentaire/{missionId}"),
    // document
    route("GET", "/document/{id}", "/document/{id}"),
    route("POST", "/document/{id}/upload", "/document/{id}/upload"),
    // facture
    route("GET", "/facture/analyseAll", "/facture/analyseAll"),
    route("GET", "/facture/all/{societeId}", "/facture/all/{societeId}"),
    route("GET", "/facture/{id}", "/facture/{id}"),
    route("POST", "/facture/{id}", "/facture/{id}"),
    route("PATCH", "/facture/{id}", "/facture/{id}"),
    // googleapi
    route("GET", "/googleapi/societes", "/googleapi/societes"),
    route("GET", "/googleapi/tasks/by-collaborator", "/googleapi/tasks/by-collaborator"),
    // societe
    route_q("GET", "/societe", "/societe/"),
    route("POST", "/societe", "/societe"),
    route("GET", "/societe/short", "/societe/short"),
    route("GET", "/societe/nom/id", "/societe/nom/id"),
    route_q("GET", "/societe/archiver", "/societe/archiver"),
    route("GET", "/societe/{id}", "/societe/{id}"),
    route("PATCH", "/societe/{id}", "/societe/{id}"),
    route("DELETE", "/societe/{id}", "/societe/{id}"),
    route("PATCH", "/societe/{id}/archiver", "/societe/{id}/archiver"),
    route("GET", "/societe/{id}/documents", "/societe/{id}/documents"),
    route("PATCH", "/societe/{id}/documents", "/societe/{id}/documents"),
    // tarif
    route("POST", "/tarif/{societeId}", "/tarif/{societeId}"),
    // task
    route_q("GET", "/task", "/task"),
    route("POST", "/task", "/task"),
    route("PATCH", "/task/batch", "/task/batch"),
    route_q("GET", "/task/collaborateur/{id}", "/task/collaborateur/{id}"),
    route("GET", "/task/societe/{societeId}", "/task/societe/{societeId}"),
    route_q("GET", "/task/{id}", "/task/{id}"),
    route("PATCH", "/task/{id}", "/task/{id}"),
    // user
    route_q("GET", "/user", "/user"),
    route("POST", "/user", "/user"),
    route("GET", "/user/cabinet", "/user/cabinet"),
    route("GET", "/user/profil", "/user/profil"),
    route("GET", "/user/favori", "/user/favori"),
    route("PATCH", "/user/favori", "/user/favori"),
    route("DELETE", "/user/favori/{societeId}", "/user/favori/{societeId}"),
    route("PATCH", "/user/{id}", "/user/{id}"),
    route("DELETE", "/user/{id}", "/user/{id}"),
    route("PATCH", "/user/{id}/cabinet", "/user/{id}/cabinet"),
];

impl RouteSpec {
    /// Parsed HTTP method. Table entries are static and always valid.
    pub fn method(&self) -> Method {
        Method::from_bytes(self.method.as_bytes()).unwrap_or(Method::GET)
    }
}
