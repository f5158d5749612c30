//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with relay, health and admin handlers
//! - Wire up middleware (request ID, tracing)
//! - Serve on a listener until shutdown
//! - Capture inbound requests and hand them to the fan-out relay

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{Request, StatusCode},
    middleware::map_request,
    response::{IntoResponse, Response},
    routing::{any, get},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::admin;
use crate::backends::BackendRegistry;
use crate::config::{AdminConfig, ProxyConfig};
use crate::error::RelayError;
use crate::http::request::{
    is_caller_request_id, mark_caller_request_id, request_id, MakeRequestUuidV4, X_REQUEST_ID,
};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::relay::{CapturedRequest, FanoutRelay, MAX_BODY_SIZE};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<BackendRegistry>,
    pub relay: Arc<FanoutRelay>,
    pub admin: AdminConfig,
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    registry: Arc<BackendRegistry>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, RelayError> {
        let registry = Arc::new(BackendRegistry::new(config.backends.iter().cloned()));
        let relay = Arc::new(FanoutRelay::new(&config.forwarding)?);

        let state = AppState {
            registry: registry.clone(),
            relay,
            admin: config.admin.clone(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            registry,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new().route("/healthz", get(health_handler));

        if config.admin.dynamic_backends {
            router = router.merge(admin::setup_admin_router(state.clone()));
        }

        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id(request.headers()),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id());

        router
            .route("/", any(proxy_handler))
            .route("/{*path}", any(proxy_handler))
            .with_state(state)
            .layer(DefaultBodyLimit::disable())
            .layer(middleware)
            // Outside SetRequestIdLayer, so it sees the caller's headers.
            .layer(map_request(mark_caller_request_id))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            backends = %self.registry.list().joined(),
            dynamic_backends = self.config.admin.dynamic_backends,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Shared handle on the backend registry.
    pub fn registry(&self) -> Arc<BackendRegistry> {
        self.registry.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Relay handler: buffer the request, snapshot the registry, fan out.
pub(crate) async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    metrics::record_inbound();

    let request_id = request_id(request.headers());
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let caller_request_id = is_caller_request_id(&request);

    let mut captured = match CapturedRequest::capture(request, MAX_BODY_SIZE).await {
        Ok(captured) => captured,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %e,
                "Rejecting inbound request"
            );
            return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large").into_response();
        }
    };
    if !caller_request_id {
        captured.headers.remove(X_REQUEST_ID);
    }

    let backends = state.registry.snapshot();
    tracing::debug!(
        request_id = %request_id,
        backends = backends.len(),
        body_bytes = captured.body.len(),
        "Relaying request"
    );

    state.relay.handle(&captured, &backends).await.into_response()
}

async fn health_handler() -> &'static str {
    "ok"
}
