//! Per-backend outbound request construction.
//!
//! Only scheme and authority come from the backend URL. Path and query are
//! always the original request's, so a path prefix configured on a backend
//! is ignored.

use axum::http::header::HOST;
use url::Url;

use crate::error::RelayError;
use crate::relay::capture::CapturedRequest;

/// Parsed destination of one relay attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendTarget {
    /// `host[:port]` of the backend, used as the log/metric label.
    pub authority: String,
    pub url: Url,
}

/// Resolve where `captured` should be sent for `backend`.
pub fn resolve_target(backend: &str, captured: &CapturedRequest) -> Result<BackendTarget, RelayError> {
    let invalid = |reason: String| RelayError::BackendUrlInvalid {
        backend: backend.to_string(),
        reason,
    };

    let base = Url::parse(backend).map_err(|e| invalid(e.to_string()))?;
    let host = base
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("missing host".to_string()))?;
    let authority = match base.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    let url = Url::parse(&format!(
        "{}://{}{}",
        base.scheme(),
        authority,
        captured.path_and_query
    ))
    .map_err(|e| RelayError::RequestConstruction(e.to_string()))?;

    Ok(BackendTarget { authority, url })
}

/// Build the replayed request: same method, headers and body bytes.
///
/// Headers are copied verbatim except `Host`, which the client derives from
/// the target URL so each backend sees its own authority.
pub fn build_request(
    client: &reqwest::Client,
    target: &BackendTarget,
    captured: &CapturedRequest,
) -> Result<reqwest::Request, RelayError> {
    let mut headers = captured.headers.clone();
    headers.remove(HOST);

    client
        .request(captured.method.clone(), target.url.clone())
        .headers(headers)
        .body(captured.body.clone())
        .build()
        .map_err(|e| RelayError::RequestConstruction(e.to_string()))
}
