//! User preference and contact endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use haven_core::{EmergencyContact, UserPreferences};

use crate::api::internal_error;
use crate::persistence::users;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PreferencesRequest {
    pub auto_alert_on_risk_zone: bool,
    #[serde(default)]
    pub share_location_with_contacts: bool,
}

/// Save a user's alerting preferences.
pub async fn set_preferences(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<PreferencesRequest>,
) -> Result<Json<UserPreferences>, (StatusCode, Json<Value>)> {
    let prefs = UserPreferences {
        user_id,
        auto_alert_on_risk_zone: req.auto_alert_on_risk_zone,
        share_location_with_contacts: req.share_location_with_contacts,
    };
    users::set_preferences(state.db().pool(), &prefs)
        .await
        .map_err(internal_error)?;
    Ok(Json(prefs))
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub priority: u32,
}

/// Register an emergency contact for a user.
pub async fn add_contact(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Json(req): Json<ContactRequest>,
) -> Result<(StatusCode, Json<EmergencyContact>), (StatusCode, Json<Value>)> {
    let contact = users::add_contact(
        state.db().pool(),
        &user_id,
        req.name,
        req.phone,
        req.email,
        req.priority,
    )
    .await
    .map_err(internal_error)?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// List a user's emergency contacts.
pub async fn list_contacts(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<EmergencyContact>>, (StatusCode, Json<Value>)> {
    users::get_contacts(state.db().pool(), &user_id)
        .await
        .map(Json)
        .map_err(internal_error)
}
