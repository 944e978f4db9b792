//! Risk evaluation endpoint and the server-side auto-alert path.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use haven_core::alerting::{build_alert_batch, should_auto_alert, NewIncident};
use haven_core::{evaluate_at, nearby_zone_count, Coordinates, RiskLevel};

use crate::api::internal_error;
use crate::persistence::{incidents, users, zones};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub in_risk_zone: bool,
    pub zone_name: Option<String>,
    pub zone_description: Option<String>,
    pub nearby_zones: usize,
}

/// Evaluate a location against the current zone set.
///
/// When a `user_id` is supplied, a passing auto-alert gate additionally
/// creates one incident and its alert batch. There is no dedup key: two
/// near-simultaneous evaluations of the same zone entry can each create
/// an incident.
pub async fn evaluate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, (StatusCode, Json<Value>)> {
    let point = Coordinates::new(req.latitude, req.longitude);
    let zone_set = state.current_zones();
    let eval = evaluate_at(point, &zone_set, state.current_bucket());

    let response = EvaluateResponse {
        risk_level: eval.level,
        risk_score: eval.score,
        in_risk_zone: eval.inside,
        zone_name: eval.zone.and_then(|z| z.name.clone()),
        zone_description: eval.zone.and_then(|z| z.description.clone()),
        nearby_zones: nearby_zone_count(point, &zone_set),
    };

    if let Some(user_id) = req.user_id.as_deref() {
        let pool = state.db().pool();
        let prefs = users::get_preferences(pool, user_id)
            .await
            .map_err(internal_error)?;

        if should_auto_alert(&eval, &prefs) {
            let incident = incidents::create_incident(
                pool,
                NewIncident::risk_zone_entry(user_id, point, &eval),
            )
            .await
            .map_err(internal_error)?;

            let contacts = users::get_contacts(pool, user_id)
                .await
                .map_err(internal_error)?;
            let batch = build_alert_batch(&incident, user_id, &contacts);
            let alerts = incidents::create_alerts(pool, batch)
                .await
                .map_err(internal_error)?;

            if let Some(zone) = eval.zone {
                zones::increment_incident_count(pool, &zone.id)
                    .await
                    .map_err(internal_error)?;
            }

            tracing::info!(
                "auto-alert incident {} for user {} ({} alerts)",
                incident.id,
                user_id,
                alerts.len()
            );
        }
    }

    Ok(Json(response))
}
