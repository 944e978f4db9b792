//! Risk zone administration endpoints.
//!
//! The evaluation core treats zones as read-only; this is the surface the
//! administrative process uses to manage them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use haven_core::{CreateZoneRequest, RiskZone, UpdateZoneRequest};

use crate::api::internal_error;
use crate::persistence::zones;
use crate::state::AppState;

/// Create a new risk zone.
pub async fn create_zone(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateZoneRequest>,
) -> Result<(StatusCode, Json<RiskZone>), (StatusCode, Json<Value>)> {
    let zone = RiskZone {
        id: Uuid::new_v4().to_string(),
        name: req.name,
        description: req.description,
        center: req.center,
        radius_m: req.radius_m,
        risk_score: req.risk_score,
        risk_level: req.risk_level,
        time_overrides: req.time_overrides,
        incident_count: 0,
        created_at: Utc::now(),
    };

    zones::upsert_zone(state.db().pool(), &zone)
        .await
        .map_err(internal_error)?;
    state.add_zone(zone.clone());
    tracing::info!("Created risk zone '{}' ({})", zone.display_name(), zone.id);

    Ok((StatusCode::CREATED, Json(zone)))
}

/// List all risk zones.
pub async fn list_zones(State(state): State<Arc<AppState>>) -> Json<Vec<RiskZone>> {
    Json(state.current_zones())
}

/// Get a specific risk zone by ID.
pub async fn get_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RiskZone>, StatusCode> {
    state.get_zone(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

/// Update an existing risk zone.
pub async fn update_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateZoneRequest>,
) -> Result<Json<RiskZone>, (StatusCode, Json<Value>)> {
    let Some(mut zone) = state.get_zone(&id) else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "zone not found" })),
        ));
    };

    if let Some(name) = req.name {
        zone.name = Some(name);
    }
    if let Some(description) = req.description {
        zone.description = Some(description);
    }
    if let Some(center) = req.center {
        zone.center = center;
    }
    if let Some(radius_m) = req.radius_m {
        zone.radius_m = radius_m;
    }
    if let Some(risk_score) = req.risk_score {
        zone.risk_score = risk_score;
    }
    if let Some(risk_level) = req.risk_level {
        zone.risk_level = risk_level;
    }
    if let Some(time_overrides) = req.time_overrides {
        zone.time_overrides = time_overrides;
    }

    zones::upsert_zone(state.db().pool(), &zone)
        .await
        .map_err(internal_error)?;
    state.add_zone(zone.clone());
    tracing::info!("Updated risk zone {}", zone.id);

    Ok(Json(zone))
}

/// Delete a risk zone by ID.
pub async fn delete_zone(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    let removed = zones::delete_zone(state.db().pool(), &id)
        .await
        .map_err(internal_error)?;

    if state.remove_zone(&id) || removed {
        tracing::info!("Deleted risk zone {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}
