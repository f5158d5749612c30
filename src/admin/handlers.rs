use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::error::RegistryError;
use crate::http::server::AppState;

/// `?server=<url>` query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct ServerParam {
    #[serde(default)]
    pub server: Option<String>,
}

impl ServerParam {
    fn server(&self) -> &str {
        self.server.as_deref().unwrap_or_default()
    }
}

impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, self.to_string()).into_response()
    }
}

pub async fn register_backend(
    State(state): State<AppState>,
    Query(param): Query<ServerParam>,
) -> Result<String, RegistryError> {
    let list = state.registry.add(param.server()).inspect_err(|e| {
        tracing::warn!(server = %param.server(), error = %e, "Register rejected");
    })?;
    Ok(list.joined())
}

pub async fn unregister_backend(
    State(state): State<AppState>,
    Query(param): Query<ServerParam>,
) -> Result<String, RegistryError> {
    let list = state.registry.remove(param.server()).inspect_err(|e| {
        tracing::warn!(error = %e, "Unregister rejected");
    })?;
    Ok(list.joined())
}

pub async fn list_backends(State(state): State<AppState>) -> String {
    state.registry.list().joined()
}
