//! SQLite persistence for zones, users, incidents, and alerts.

pub mod db;
pub mod incidents;
pub mod users;
pub mod zones;

pub use db::{init_database, Database};

use haven_core::{AlertType, IncidentStatus, RiskLevel};

// Enum <-> TEXT column mappings, kept next to the queries that use them.

pub(crate) fn risk_level_str(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Safe => "safe",
        RiskLevel::AtRisk => "at_risk",
        RiskLevel::Emergency => "emergency",
    }
}

pub(crate) fn parse_risk_level(s: &str) -> RiskLevel {
    match s {
        "at_risk" => RiskLevel::AtRisk,
        "emergency" => RiskLevel::Emergency,
        _ => RiskLevel::Safe,
    }
}

pub(crate) fn alert_type_str(alert_type: AlertType) -> &'static str {
    match alert_type {
        AlertType::Sos => "sos",
        AlertType::RiskZoneEntry => "risk_zone_entry",
        AlertType::AutoAlert => "auto_alert",
    }
}

pub(crate) fn parse_alert_type(s: &str) -> AlertType {
    match s {
        "sos" => AlertType::Sos,
        "risk_zone_entry" => AlertType::RiskZoneEntry,
        _ => AlertType::AutoAlert,
    }
}

pub(crate) fn incident_status_str(status: IncidentStatus) -> &'static str {
    match status {
        IncidentStatus::Active => "active",
        IncidentStatus::Resolved => "resolved",
        IncidentStatus::Pending => "pending",
    }
}

pub(crate) fn parse_incident_status(s: &str) -> IncidentStatus {
    match s {
        "active" => IncidentStatus::Active,
        "resolved" => IncidentStatus::Resolved,
        _ => IncidentStatus::Pending,
    }
}
