//! Edge gateway library.
//!
//! Sits in front of a web UI and a separate backend API: gates page
//! navigation on a session cookie and forwards every API call to the one
//! configured upstream.

pub mod config;
pub mod error;
pub mod http;
pub mod net;
pub mod routing;
pub mod session;

pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
