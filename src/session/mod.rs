//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! Page navigation:
//!     Cookie header
//!     → gate.rs (exempt / public path rules)
//!     → credential.rs (split, decode claims, read exp)
//!     → Continue, or 302 to login (+ cookie.rs clearing cookie)
//!
//! API calls:
//!     Upstream 401
//!     → events.rs (notification port for the UI layer)
//! ```
//!
//! # Design Decisions
//! - The credential is decoded but never verified; the backend is authoritative
//! - Decode failures never escape: they fold into an "invalid" redirect
//! - The gateway holds no session state; the cookie is the only store

pub mod cookie;
pub mod credential;
pub mod events;
pub mod gate;

pub use cookie::CookiePolicy;
pub use events::{LoggingSessionEvents, SessionEvents, SharedSessionEvents};
pub use gate::{session_gate, GateDecision, GatePolicy, GateState, RedirectReason};
