//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!
//! Shutdown (shutdown.rs):
//!     Trigger → Stop accepting → Drain in-flight requests → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup lives in main.rs: config, logging, metrics, listener
//! - In-flight requests finish before the server future resolves

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
