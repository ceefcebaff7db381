//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → plain: tokio TcpListener handed to axum::serve
//!     → tls.rs: rustls termination via axum-server
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and handled transparently
//! - TLS presence also decides the credential cookie's `Secure` default

pub mod tls;
