//! Read-only incident views for the client UI.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use haven_core::{Alert, Incident};

use crate::api::internal_error;
use crate::persistence::incidents;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct IncidentQuery {
    pub user_id: String,
}

/// List a user's incidents, newest first.
pub async fn list_incidents(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IncidentQuery>,
) -> Result<Json<Vec<Incident>>, (StatusCode, Json<Value>)> {
    incidents::list_incidents(state.db().pool(), &query.user_id)
        .await
        .map(Json)
        .map_err(internal_error)
}

/// List the alerts fanned out for one incident.
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Path(incident_id): Path<String>,
) -> Result<Json<Vec<Alert>>, (StatusCode, Json<Value>)> {
    incidents::list_alerts(state.db().pool(), &incident_id)
        .await
        .map(Json)
        .map_err(internal_error)
}
