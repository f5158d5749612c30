//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs)
//!     → CLI flags / SPRAYPROXY_* environment (ConfigOverrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the backend registry changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigOverrides};
pub use schema::{
    AdminConfig, ForwardingConfig, ListenerConfig, LogFormat, ObservabilityConfig, ProxyConfig,
    DEFAULT_FORWARDING_TIMEOUT,
};
pub use validation::{validate_config, ValidationError};
