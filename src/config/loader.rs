//! Configuration loading: defaults, optional TOML file, then overrides.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Values resolved from command-line flags and environment variables.
///
/// `None` leaves the file/default value untouched.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub backends: Vec<String>,
    pub insecure_skip_tls_verify: Option<bool>,
    pub forwarding_timeout: Option<String>,
    pub dynamic_backends: Option<bool>,
    pub admin_api_key: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub metrics_enabled: Option<bool>,
    pub metrics_address: Option<String>,
}

impl ConfigOverrides {
    /// Apply these overrides on top of `config`.
    pub fn apply(self, config: &mut ProxyConfig) {
        if self.host.is_some() || self.port.is_some() {
            let (current_host, current_port) = split_bind_address(&config.listener.bind_address);
            let host = self.host.unwrap_or(current_host);
            let port = self.port.map(|p| p.to_string()).unwrap_or(current_port);
            config.listener.bind_address = if host.contains(':') && !host.starts_with('[') {
                format!("[{host}]:{port}")
            } else {
                format!("{host}:{port}")
            };
        }

        // Backends given on the command line extend the file list.
        for backend in self.backends {
            for entry in backend.split_whitespace() {
                if !config.backends.iter().any(|b| b == entry) {
                    config.backends.push(entry.to_string());
                }
            }
        }

        if let Some(insecure) = self.insecure_skip_tls_verify {
            config.forwarding.insecure_skip_tls_verify = insecure;
        }
        if let Some(timeout) = self.forwarding_timeout {
            config.forwarding.request_timeout = Some(timeout);
        }
        if let Some(enabled) = self.dynamic_backends {
            config.admin.dynamic_backends = enabled;
        }
        if let Some(key) = self.admin_api_key.filter(|k| !k.is_empty()) {
            config.admin.api_key = Some(key);
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
        if let Some(enabled) = self.metrics_enabled {
            config.observability.metrics_enabled = enabled;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = addr;
        }
    }
}

fn split_bind_address(addr: &str) -> (String, String) {
    match addr.rsplit_once(':') {
        Some((host, port)) => (
            host.trim_start_matches('[').trim_end_matches(']').to_string(),
            port.to_string(),
        ),
        None => (addr.to_string(), "8080".to_string()),
    }
}

/// Load, override and validate the configuration.
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn defaults_without_file() {
        let config = load_config(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.forwarding.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
backends = ["http://a:8000"]

[listener]
bind_address = "127.0.0.1:9000"

[forwarding]
request_timeout = "5s"
"#
        )
        .unwrap();

        let overrides = ConfigOverrides {
            port: Some(9100),
            backends: vec!["http://b:8000 http://a:8000".into()],
            insecure_skip_tls_verify: Some(true),
            dynamic_backends: Some(true),
            ..Default::default()
        };
        let config = load_config(Some(file.path()), overrides).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9100");
        assert_eq!(config.backends, vec!["http://a:8000", "http://b:8000"]);
        assert_eq!(config.forwarding.timeout(), Some(Duration::from_secs(5)));
        assert!(config.forwarding.insecure_skip_tls_verify);
        assert!(config.admin.dynamic_backends);
    }

    #[test]
    fn ipv6_host_override() {
        let overrides = ConfigOverrides {
            host: Some("::1".into()),
            port: Some(8443),
            ..Default::default()
        };
        let config = load_config(None, overrides).unwrap();
        assert_eq!(config.listener.bind_address, "[::1]:8443");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/spray.toml")), ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn invalid_bind_address_fails_validation() {
        let overrides = ConfigOverrides {
            host: Some("not a host".into()),
            ..Default::default()
        };
        let err = load_config(None, overrides).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
