//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (BACKEND_URL)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the upstream origin never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, read_config, ConfigError, BACKEND_URL_ENV};
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::SessionConfig;
pub use schema::UpstreamConfig;
pub use schema::{ObservabilityConfig, RoutingConfig, SameSitePolicy, SecurityConfig, TimeoutConfig, TlsConfig};
