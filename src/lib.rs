//! Fan-out HTTP relay library.
//!
//! Every inbound request is buffered once and replayed, unmodified, against
//! each backend currently in the registry. The caller gets a single verdict.

pub mod admin;
pub mod backends;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use backends::BackendRegistry;
pub use config::schema::ProxyConfig;
pub use error::{RegistryError, RelayError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use relay::{AggregateResult, CapturedRequest, FanoutRelay};
