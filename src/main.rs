//! Spray proxy: fan-out HTTP relay.
//!
//! # Architecture Overview
//!
//! ```text
//!   Inbound request ──▶ http server ──▶ capture (≤ 25 MiB)
//!                                          │
//!                                          ▼
//!                    registry snapshot ──▶ fanout ──▶ backend A
//!                           ▲                  ├────▶ backend B
//!                           │                  └────▶ backend C
//!   Admin /backends ──▶ admin handlers
//!
//!   Caller receives one status: 200 "proxied", 413, or 502 "failed to proxy"
//! ```

use clap::Parser;
use std::path::PathBuf;

use spray_proxy::config::{load_config, ConfigOverrides, LogFormat};
use spray_proxy::lifecycle::startup;
use spray_proxy::observability::logging::init_logging;

/// Relay every inbound request to all registered backends.
#[derive(Parser, Debug)]
#[command(name = "spray-proxy", version, about)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long, env = "SPRAYPROXY_CONFIG")]
    config: Option<PathBuf>,

    /// Host to listen on.
    #[arg(long, env = "SPRAYPROXY_SERVER_HOST")]
    host: Option<String>,

    /// Port to listen on.
    #[arg(long, env = "SPRAYPROXY_SERVER_PORT")]
    port: Option<u16>,

    /// Backend base URL. Repeatable; the environment form is space separated.
    #[arg(long = "backend", env = "SPRAYPROXY_SERVER_BACKEND")]
    backends: Vec<String>,

    /// Skip TLS verification on outbound requests. Insecure.
    #[arg(long, env = "SPRAYPROXY_SERVER_INSECURE_SKIP_TLS_VERIFY")]
    insecure_skip_tls_verify: Option<bool>,

    /// Per-backend forwarding timeout, e.g. "15s".
    #[arg(long, env = "SPRAYPROXY_FORWARDING_REQUEST_TIMEOUT")]
    forwarding_request_timeout: Option<String>,

    /// Expose the /backends register, unregister and list endpoints.
    #[arg(long, env = "SPRAYPROXY_SERVER_ENABLE_DYNAMIC_BACKENDS")]
    enable_dynamic_backends: Option<bool>,

    /// Bearer key required by the admin endpoints.
    #[arg(long, env = "SPRAYPROXY_ADMIN_API_KEY", hide_env_values = true)]
    admin_api_key: Option<String>,

    #[arg(long, env = "SPRAYPROXY_LOG_LEVEL")]
    log_level: Option<String>,

    /// pretty or json.
    #[arg(long, env = "SPRAYPROXY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[arg(long, env = "SPRAYPROXY_METRICS_ENABLED")]
    metrics_enabled: Option<bool>,

    #[arg(long, env = "SPRAYPROXY_METRICS_ADDRESS")]
    metrics_address: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        Self {
            host: cli.host,
            port: cli.port,
            backends: cli.backends,
            insecure_skip_tls_verify: cli.insecure_skip_tls_verify,
            forwarding_timeout: cli.forwarding_request_timeout,
            dynamic_backends: cli.enable_dynamic_backends,
            admin_api_key: cli.admin_api_key,
            log_level: cli.log_level,
            log_format: cli.log_format,
            metrics_enabled: cli.metrics_enabled,
            metrics_address: cli.metrics_address,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cli = Cli::parse();
    let config_path = cli.config.take();

    let config = load_config(config_path.as_deref(), cli.into())?;
    init_logging(&config.observability);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        insecure_skip_tls_verify = config.forwarding.insecure_skip_tls_verify,
        dynamic_backends = config.admin.dynamic_backends,
        "spray-proxy v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    startup::start(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
