//! API routes for the Haven server.

pub mod incidents;
pub mod risk;
mod routes;
pub mod sos;
pub mod users;
pub mod zones;

use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

pub fn routes() -> axum::Router<std::sync::Arc<crate::state::AppState>> {
    routes::create_router()
}

/// 500 with a human-readable message; no partial results leak out.
pub(crate) fn internal_error(err: anyhow::Error) -> (StatusCode, Json<Value>) {
    tracing::error!("request failed: {:#}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": err.to_string() })),
    )
}

#[cfg(test)]
mod tests;
