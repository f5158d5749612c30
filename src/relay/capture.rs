//! Inbound request capture.
//!
//! # Responsibilities
//! - Buffer the inbound body up to [`MAX_BODY_SIZE`]
//! - Keep method, path+query and headers verbatim for replay

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request};

use crate::error::RelayError;
use crate::http::request::request_id;

/// Largest body accepted for relay (GitHub webhook payloads cap at 25 MiB).
pub const MAX_BODY_SIZE: usize = 25 * 1024 * 1024;

/// Immutable snapshot of an inbound request, ready for replay.
///
/// The body is a shared, reference-counted buffer: each backend gets its own
/// handle onto the same bytes.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    /// Original request target (`/path?query`).
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub request_id: String,
}

impl CapturedRequest {
    /// Capture `request`, buffering at most `limit` body bytes.
    ///
    /// Any body read failure is reported as [`RelayError::BodyTooLarge`].
    pub async fn capture(request: Request<Body>, limit: usize) -> Result<Self, RelayError> {
        let (parts, body) = request.into_parts();

        let body = axum::body::to_bytes(body, limit).await.map_err(|e| {
            tracing::debug!(error = %e, limit, "Failed to buffer request body");
            RelayError::BodyTooLarge { limit }
        })?;

        let path_and_query = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Ok(Self {
            method: parts.method,
            path_and_query,
            request_id: request_id(&parts.headers),
            headers: parts.headers,
            body,
        })
    }

    pub fn path(&self) -> &str {
        self.path_and_query
            .split_once('?')
            .map(|(path, _)| path)
            .unwrap_or(&self.path_and_query)
    }

    pub fn query(&self) -> &str {
        self.path_and_query
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }
}
