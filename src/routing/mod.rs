//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound API request (method, path below /api, query)
//!     → router.rs (route lookup)
//!     → matcher.rs (segment match, parameter capture)
//!     → Return: backend-relative path (specific entry or catch-all)
//!
//! Route Compilation (at startup):
//!     table.rs ROUTES
//!     → Compile patterns
//!     → Sort by specificity
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always resolves to the same target
//! - Never a miss: the catch-all forwards anything unmapped

pub mod matcher;
pub mod router;
pub mod table;

pub use router::{ResolvedRoute, RouteTable, CATCH_ALL};
