//! Core data models for the Haven safety system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographic position in decimal degrees (WGS84 assumed).
///
/// Values are never range-checked: an out-of-range latitude still flows
/// through the distance math and produces a numeric, non-panicking result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `lat,lon` form used in map links and log lines.
    pub fn to_query_string(&self) -> String {
        format!("{},{}", self.lat, self.lon)
    }
}

/// Risk classification carried by zones and evaluation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No zone influence detected
    #[default]
    Safe,
    /// Inside or approaching an elevated-risk zone
    AtRisk,
    /// Inside a zone classified as an emergency area
    Emergency,
}

/// Per-time-bucket score overrides for a zone.
///
/// A missing bucket falls back to the zone's base `risk_score`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub night: Option<f64>,
}

/// A circular geofenced risk area.
///
/// Zones are read-only inputs to evaluation; they are created and updated
/// through the administration endpoints, never by the evaluator itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskZone {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub center: Coordinates,
    /// Zone radius in meters (positive by convention, not validated here)
    pub radius_m: f64,
    /// Base risk score, conventionally in [0, 1] but not clamped
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub time_overrides: TimeOverrides,
    /// Informational counter maintained by the incident workflow
    #[serde(default)]
    pub incident_count: u32,
    pub created_at: DateTime<Utc>,
}

impl RiskZone {
    /// Display name for messages and logs.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed zone")
    }
}

/// Request to create a new risk zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateZoneRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub center: Coordinates,
    pub radius_m: f64,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub time_overrides: TimeOverrides,
}

/// Request to update an existing risk zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateZoneRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub center: Option<Coordinates>,
    pub radius_m: Option<f64>,
    pub risk_score: Option<f64>,
    pub risk_level: Option<RiskLevel>,
    pub time_overrides: Option<TimeOverrides>,
}

/// What triggered an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    /// User pressed the SOS button
    Sos,
    /// Automatic alert on entering an emergency zone
    RiskZoneEntry,
    /// Other automated trigger
    AutoAlert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncidentStatus {
    Active,
    Resolved,
    Pending,
}

/// A recorded safety event (SOS or automatic zone-entry alert).
///
/// Created once per triggering event; resolution workflows mutate status
/// and `resolved_at` later, outside this core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    pub id: String,
    pub user_id: String,
    pub location: Coordinates,
    pub alert_type: AlertType,
    pub status: IncidentStatus,
    /// Risk level at creation time
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

/// One notification record tied to exactly one incident and one recipient.
///
/// Authority alerts carry `contact_id = None` and `sent_to_police = true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub incident_id: String,
    #[serde(default)]
    pub contact_id: Option<String>,
    pub message: String,
    pub location: Coordinates,
    pub sent_to_police: bool,
    /// Delivery acknowledgement, flipped by the external delivery channel
    pub delivered: bool,
    pub sent_at: DateTime<Utc>,
}

/// An emergency contact registered by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Notification ordering, lower first
    #[serde(default)]
    pub priority: u32,
}

/// Stored per-user alerting preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub user_id: String,
    pub auto_alert_on_risk_zone: bool,
    #[serde(default)]
    pub share_location_with_contacts: bool,
}

impl UserPreferences {
    /// Defaults for users who never saved preferences: nothing fires.
    pub fn default_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            auto_alert_on_risk_zone: false,
            share_location_with_contacts: false,
        }
    }
}
