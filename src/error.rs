//! Error types for the relay and the backend registry.

use thiserror::Error;

/// Errors raised while capturing or relaying an inbound request.
///
/// Only [`RelayError::BodyTooLarge`] aborts a whole relay. The per-backend
/// variants are folded into the aggregate result and never reach the caller.
#[derive(Error, Debug)]
pub enum RelayError {
    /// Inbound body exceeded the buffering limit (or could not be read).
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Backend URL could not be parsed or carries no host.
    #[error("invalid backend url {backend:?}: {reason}")]
    BackendUrlInvalid { backend: String, reason: String },

    /// Outbound request could not be built.
    #[error("failed to create request: {0}")]
    RequestConstruction(String),

    /// Timeout, connection, DNS or TLS failure talking to a backend.
    #[error("proxy error ({kind}): {source}")]
    Transport {
        kind: TransportErrorKind,
        #[source]
        source: reqwest::Error,
    },

    /// Outbound HTTP client could not be initialized.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl RelayError {
    /// Wrap a transport error, classifying it for logs.
    pub fn transport(source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            TransportErrorKind::Timeout
        } else if source.is_connect() {
            TransportErrorKind::Connect
        } else {
            TransportErrorKind::Other
        };
        RelayError::Transport { kind, source }
    }
}

/// Coarse classification of outbound transport failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Other,
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportErrorKind::Timeout => write!(f, "timeout"),
            TransportErrorKind::Connect => write!(f, "connect"),
            TransportErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Validation failures on registry mutation. Rejected before any change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("server parameter is missing")]
    MissingParameter,

    #[error("already there")]
    AlreadyRegistered(String),
}
