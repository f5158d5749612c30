//! Request identification.
//!
//! # Responsibilities
//! - Generate a UUID v4 `x-request-id` when the caller sent none
//! - Read the request ID back for logging
//!
//! # Design Decisions
//! - A caller-supplied request ID is kept as-is
//! - Request ID added as early as possible so every log line carries it
//! - A generated ID is for logs and the response only, never replayed

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Generates UUID v4 request IDs for [`tower_http::request_id::SetRequestIdLayer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Extension marking a request whose caller sent its own `x-request-id`.
#[derive(Debug, Clone, Copy)]
pub struct CallerRequestId;

/// Runs ahead of [`tower_http::request_id::SetRequestIdLayer`] to record
/// whether the ID about to be seen downstream came from the caller.
pub async fn mark_caller_request_id(mut request: Request<Body>) -> Request<Body> {
    if request.headers().contains_key(X_REQUEST_ID) {
        request.extensions_mut().insert(CallerRequestId);
    }
    request
}

/// True when the caller supplied the request ID itself.
pub fn is_caller_request_id<B>(request: &Request<B>) -> bool {
    request.extensions().get::<CallerRequestId>().is_some()
}

/// Request ID carried in `headers`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_uuids() {
        let request = Request::new(());
        let mut maker = MakeRequestUuidV4;
        let a = maker.make_request_id(&request).unwrap();
        let b = maker.make_request_id(&request).unwrap();

        let a = a.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(a).is_ok());
        assert_ne!(a, b.header_value().to_str().unwrap());
    }

    #[test]
    fn reads_request_id_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");
        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc"));
        assert_eq!(request_id(&headers), "abc");
    }

    #[tokio::test]
    async fn marks_only_caller_supplied_ids() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert!(!is_caller_request_id(&mark_caller_request_id(request).await));

        let request = Request::builder()
            .header(X_REQUEST_ID, "delivery-1")
            .body(Body::empty())
            .unwrap();
        assert!(is_caller_request_id(&mark_caller_request_id(request).await));
    }
}
