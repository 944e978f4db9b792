//! SOS endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use haven_core::alerting::{build_alert_batch, NewIncident};
use haven_core::{Coordinates, Incident};

use crate::api::internal_error;
use crate::persistence::{incidents, users};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SosRequest {
    pub user_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SosResponse {
    pub incident: Incident,
    pub alerts_sent: usize,
}

/// Raise an SOS incident and fan out its alert batch: one alert per
/// emergency contact plus the authority alert.
pub async fn trigger_sos(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SosRequest>,
) -> Result<(StatusCode, Json<SosResponse>), (StatusCode, Json<Value>)> {
    let location = Coordinates::new(req.latitude, req.longitude);
    let pool = state.db().pool();

    let incident = incidents::create_incident(
        pool,
        NewIncident::sos(&req.user_id, location, req.description),
    )
    .await
    .map_err(internal_error)?;

    let contacts = users::get_contacts(pool, &req.user_id)
        .await
        .map_err(internal_error)?;
    let batch = build_alert_batch(&incident, &req.user_id, &contacts);
    let alerts = incidents::create_alerts(pool, batch)
        .await
        .map_err(internal_error)?;

    tracing::info!(
        "SOS incident {} for user {} ({} alerts)",
        incident.id,
        req.user_id,
        alerts.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(SosResponse {
            incident,
            alerts_sent: alerts.len(),
        }),
    ))
}
