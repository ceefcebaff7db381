//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, typed inbound body)
//!     → [routing layer resolves the backend path]
//!     → forwarder.rs (allow-listed headers, re-encoded body, upstream call)
//!     → translator.rs (status, Set-Cookie, content-type branch)
//!     → Send to client
//! ```

pub mod forwarder;
pub mod request;
pub mod server;
pub mod translator;

pub use forwarder::Forwarder;
pub use request::{InboundBody, InboundRequest, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, GatewayServer};
