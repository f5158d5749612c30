//! Fan-out of one captured request to every backend in a snapshot.
//!
//! # Responsibilities
//! - One independent attempt per backend, no retries
//! - Per-backend logs and metrics
//! - Fold outcomes into a single aggregate verdict
//!
//! # Design Decisions
//! - Attempts run concurrently; outcomes keep snapshot order
//! - A backend answering 4xx/5xx is relayed, not failed
//! - Response bodies are consumed inside the attempt that fetched them

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures_util::future::join_all;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::config::ForwardingConfig;
use crate::error::RelayError;
use crate::observability::metrics;
use crate::relay::capture::CapturedRequest;
use crate::relay::outbound::{build_request, resolve_target};

/// Result of relaying to a single backend.
#[derive(Debug)]
pub enum BackendOutcome {
    /// The backend answered, whatever the status.
    Relayed {
        backend: String,
        status: StatusCode,
        latency: Duration,
    },
    /// URL, construction or transport failure.
    Failed {
        backend: String,
        error: RelayError,
        latency: Option<Duration>,
    },
}

impl BackendOutcome {
    pub fn backend(&self) -> &str {
        match self {
            BackendOutcome::Relayed { backend, .. } | BackendOutcome::Failed { backend, .. } => backend,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, BackendOutcome::Failed { .. })
    }
}

/// Verdict for one inbound request.
#[derive(Debug, Default)]
pub struct AggregateResult {
    outcomes: Vec<BackendOutcome>,
}

impl AggregateResult {
    pub fn new(outcomes: Vec<BackendOutcome>) -> Self {
        Self { outcomes }
    }

    /// True when any backend hit a URL, construction or transport failure.
    pub fn is_failure(&self) -> bool {
        self.outcomes.iter().any(BackendOutcome::is_failure)
    }

    pub fn status(&self) -> StatusCode {
        if self.is_failure() {
            StatusCode::BAD_GATEWAY
        } else {
            StatusCode::OK
        }
    }

    pub fn message(&self) -> &'static str {
        if self.is_failure() {
            "failed to proxy"
        } else {
            "proxied"
        }
    }

    /// Per-backend detail, in snapshot order. Never sent to the caller.
    pub fn outcomes(&self) -> &[BackendOutcome] {
        &self.outcomes
    }
}

impl IntoResponse for AggregateResult {
    fn into_response(self) -> Response {
        (self.status(), self.message()).into_response()
    }
}

/// Replays captured requests against a backend list.
///
/// Timeout and TLS policy are fixed at construction.
#[derive(Debug, Clone)]
pub struct FanoutRelay {
    client: reqwest::Client,
    timeout: Option<Duration>,
    insecure_tls: bool,
}

impl FanoutRelay {
    pub fn new(config: &ForwardingConfig) -> Result<Self, RelayError> {
        let timeout = config.timeout();
        let insecure_tls = config.insecure_skip_tls_verify;

        let mut builder = reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure_tls)
            .no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RelayError::ClientBuild)?;

        match timeout {
            Some(timeout) => tracing::info!(
                timeout = %humantime::format_duration(timeout),
                insecure_tls,
                "Proxy forwarding request timeout configured"
            ),
            None => tracing::info!(insecure_tls, "Proxy forwarding request timeout disabled"),
        }

        Ok(Self {
            client,
            timeout,
            insecure_tls,
        })
    }

    /// Per-request timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn insecure_skip_tls_verify(&self) -> bool {
        self.insecure_tls
    }

    /// Relay `request` to every entry of `backends` and aggregate the outcomes.
    pub async fn handle(&self, request: &CapturedRequest, backends: &[String]) -> AggregateResult {
        let attempts = backends.iter().map(|backend| self.relay_one(request, backend));
        let outcomes = join_all(attempts).await;

        let result = AggregateResult::new(outcomes);
        if result.is_failure() {
            tracing::warn!(
                request_id = %request.request_id,
                backends = backends.len(),
                failed = result.outcomes().iter().filter(|o| o.is_failure()).count(),
                "Relay incomplete"
            );
        }
        result
    }

    async fn relay_one(&self, request: &CapturedRequest, backend: &str) -> BackendOutcome {
        let target = match resolve_target(backend, request) {
            Ok(target) => target,
            Err(e) => {
                tracing::error!(
                    request_id = %request.request_id,
                    method = %request.method,
                    path = %request.path(),
                    query = %request.query(),
                    insecure_tls = self.insecure_tls,
                    error = %e,
                    "Failed to parse backend"
                );
                return BackendOutcome::Failed {
                    backend: backend.to_string(),
                    error: e,
                    latency: None,
                };
            }
        };

        let span = tracing::info_span!(
            "relay",
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path(),
            query = %request.query(),
            insecure_tls = self.insecure_tls,
            backend = %target.authority,
        );

        async {
            let outbound = match build_request(&self.client, &target, request) {
                Ok(outbound) => outbound,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create request");
                    return BackendOutcome::Failed {
                        backend: backend.to_string(),
                        error: e,
                        latency: None,
                    };
                }
            };

            metrics::record_forwarded(&target.authority);

            let start = Instant::now();
            let result = self.client.execute(outbound).await;
            let latency = start.elapsed();
            metrics::record_response_time(latency);

            let response = match result {
                Ok(response) => response,
                Err(e) => {
                    let e = RelayError::transport(e);
                    tracing::error!(latency = ?latency, error = %e, "Proxy error");
                    return BackendOutcome::Failed {
                        backend: backend.to_string(),
                        error: e,
                        latency: Some(latency),
                    };
                }
            };

            let status = response.status();
            tracing::info!(latency = ?latency, status = status.as_u16(), "Proxied request");

            if status.is_client_error() || status.is_server_error() {
                // Best effort; the response is released here either way.
                match response.text().await {
                    Ok(body) => tracing::info!(status = status.as_u16(), body = %body, "Response body"),
                    Err(e) => tracing::info!(status = status.as_u16(), error = %e, "Failed to read response"),
                }
            }

            BackendOutcome::Relayed {
                backend: backend.to_string(),
                status,
                latency,
            }
        }
        .instrument(span)
        .await
    }
}
