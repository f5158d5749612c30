//! Backend registration endpoints.
//!
//! ```text
//! POST   /backends?server=<url>  → register, 200 with the space-joined list
//! DELETE /backends?server=<url>  → unregister, 200 with the space-joined list
//! GET    /backends               → list
//! other  /backends               → relayed like any other path
//! ```

pub mod auth;
pub mod handlers;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::http::server::{proxy_handler, AppState};

/// Admin routes, guarded by the bearer key when one is configured.
///
/// The key only guards the admin methods; the method fallback is the relay.
pub fn setup_admin_router(state: AppState) -> Router<AppState> {
    Router::new().route(
        "/backends",
        get(list_backends)
            .post(register_backend)
            .delete(unregister_backend)
            .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware))
            .fallback(proxy_handler),
    )
}
