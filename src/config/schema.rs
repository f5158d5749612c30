//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the optional TOML
//! file; every field has a default so an empty file is a valid config.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Forwarding timeout used when none is configured or it fails to parse.
pub const DEFAULT_FORWARDING_TIMEOUT: Duration = Duration::from_secs(15);

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Outbound request policy.
    pub forwarding: ForwardingConfig,

    /// Initial backend base URLs, in relay order.
    pub backends: Vec<String>,

    /// Backend registration endpoints.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Outbound forwarding configuration, fixed for the process lifetime.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Per-backend request timeout as a duration string ("15s", "500ms", "1m").
    pub request_timeout: Option<String>,

    /// Skip TLS certificate verification on every outbound request.
    pub insecure_skip_tls_verify: bool,
}

impl ForwardingConfig {
    /// Resolved timeout. Unparsable values fall back to [`DEFAULT_FORWARDING_TIMEOUT`];
    /// an explicit zero disables the per-request timeout and yields `None`.
    pub fn timeout(&self) -> Option<Duration> {
        let timeout = self
            .request_timeout
            .as_deref()
            .and_then(|raw| humantime::parse_duration(raw.trim()).ok())
            .unwrap_or(DEFAULT_FORWARDING_TIMEOUT);
        (!timeout.is_zero()).then_some(timeout)
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Expose `/backends` register/unregister/list endpoints.
    pub dynamic_backends: bool,

    /// Bearer token required on admin endpoints when set.
    pub api_key: Option<String>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}', expected pretty or json")),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_defaults_to_fifteen_seconds() {
        assert_eq!(ForwardingConfig::default().timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn timeout_parses_duration_strings() {
        let cases = [("30s", 30_000), ("500ms", 500), ("1m", 60_000)];
        for (raw, millis) in cases {
            let config = ForwardingConfig {
                request_timeout: Some(raw.to_string()),
                ..Default::default()
            };
            assert_eq!(config.timeout(), Some(Duration::from_millis(millis)), "{raw}");
        }
    }

    #[test]
    fn unparsable_timeout_falls_back() {
        let config = ForwardingConfig {
            request_timeout: Some("soon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.timeout(), Some(DEFAULT_FORWARDING_TIMEOUT));
    }

    #[test]
    fn zero_timeout_disables_it() {
        for raw in ["0s", "0ms"] {
            let config = ForwardingConfig {
                request_timeout: Some(raw.to_string()),
                ..Default::default()
            };
            assert_eq!(config.timeout(), None, "{raw}");
        }
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.backends.is_empty());
        assert!(!config.admin.dynamic_backends);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }
}
