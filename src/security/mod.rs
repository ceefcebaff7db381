//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Every response leaving the gateway:
//!     → headers.rs (nosniff, frame denial, CSP, HSTS, ...)
//!     → Client
//! ```
//!
//! # Design Decisions
//! - Body size is capped before any buffering (see server.rs)
//! - No trust in client input: only allow-listed headers go upstream

pub mod headers;

pub use headers::{apply_security_headers, SecurityHeaders};
