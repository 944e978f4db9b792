//! Auto-alert decision and alert fan-out.
//!
//! Everything here is a pure transform from an evaluation or incident to
//! records; persistence and delivery belong to the caller.

use chrono::{DateTime, Utc};

use crate::evaluator::Evaluation;
use crate::models::{
    Alert, AlertType, Coordinates, EmergencyContact, Incident, IncidentStatus, RiskLevel,
    UserPreferences,
};

/// Server-side gate for automatic zone-entry alerts.
///
/// Fires only when the user is actually inside an emergency-level zone and
/// has opted in. Flipping any one of the three conditions suppresses it;
/// a non-fire is a silent no-op, not an error.
pub fn should_auto_alert(eval: &Evaluation<'_>, prefs: &UserPreferences) -> bool {
    eval.inside && eval.level == RiskLevel::Emergency && prefs.auto_alert_on_risk_zone
}

/// Fields for a new incident; the caller assigns id and timestamps at
/// persistence time.
#[derive(Debug, Clone)]
pub struct NewIncident {
    pub user_id: String,
    pub location: Coordinates,
    pub alert_type: AlertType,
    pub status: IncidentStatus,
    pub risk_level: RiskLevel,
    pub description: Option<String>,
}

impl NewIncident {
    /// Incident raised automatically when an evaluation passes the
    /// auto-alert gate.
    pub fn risk_zone_entry(user_id: &str, location: Coordinates, eval: &Evaluation<'_>) -> Self {
        let zone_name = eval
            .zone
            .map(|z| z.display_name().to_string())
            .unwrap_or_else(|| "unknown zone".to_string());
        Self {
            user_id: user_id.to_string(),
            location,
            alert_type: AlertType::RiskZoneEntry,
            status: IncidentStatus::Pending,
            risk_level: eval.level,
            description: Some(format!("Automatic alert: entered risk zone '{zone_name}'")),
        }
    }

    /// Incident raised by the SOS button.
    pub fn sos(user_id: &str, location: Coordinates, description: Option<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            location,
            alert_type: AlertType::Sos,
            status: IncidentStatus::Active,
            risk_level: RiskLevel::Emergency,
            description,
        }
    }

    pub fn into_incident(self, id: String, created_at: DateTime<Utc>) -> Incident {
        Incident {
            id,
            user_id: self.user_id,
            location: self.location,
            alert_type: self.alert_type,
            status: self.status,
            risk_level: self.risk_level,
            description: self.description,
            created_at,
            resolved_at: None,
        }
    }
}

/// An alert ready to persist, minus its server-assigned id.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub incident_id: String,
    pub contact_id: Option<String>,
    pub message: String,
    pub location: Coordinates,
    pub sent_to_police: bool,
}

impl NewAlert {
    pub fn into_alert(self, id: String, sent_at: DateTime<Utc>) -> Alert {
        Alert {
            id,
            incident_id: self.incident_id,
            contact_id: self.contact_id,
            message: self.message,
            location: self.location,
            sent_to_police: self.sent_to_police,
            delivered: false,
            sent_at,
        }
    }
}

fn map_link(location: Coordinates) -> String {
    format!("https://maps.google.com/?q={}", location.to_query_string())
}

/// Render the message sent to one emergency contact.
fn contact_message(incident: &Incident, sender_name: &str, contact: &EmergencyContact) -> String {
    let context = match incident.alert_type {
        AlertType::Sos => "triggered an SOS".to_string(),
        AlertType::RiskZoneEntry | AlertType::AutoAlert => {
            let detail = incident
                .description
                .as_deref()
                .unwrap_or("entered a risk zone");
            format!("may be in danger ({detail})")
        }
    };
    format!(
        "{contact_name}: {sender_name} {context}. Location: {link} at {timestamp}.",
        contact_name = contact.name,
        link = map_link(incident.location),
        timestamp = incident.created_at.to_rfc3339(),
    )
}

fn authority_message(incident: &Incident, sender_name: &str) -> String {
    format!(
        "Emergency SOS from {sender_name}. Location: {link} at {timestamp}.",
        link = map_link(incident.location),
        timestamp = incident.created_at.to_rfc3339(),
    )
}

/// Build the alert batch for an incident: one personalized alert per
/// contact, plus exactly one authority alert when the trigger was an SOS.
/// Automatic risk-zone alerts notify contacts only.
///
/// All alerts share the incident's location. The caller persists the
/// whole batch in one transaction.
pub fn build_alert_batch(
    incident: &Incident,
    sender_name: &str,
    contacts: &[EmergencyContact],
) -> Vec<NewAlert> {
    let mut batch: Vec<NewAlert> = contacts
        .iter()
        .map(|contact| NewAlert {
            incident_id: incident.id.clone(),
            contact_id: Some(contact.id.clone()),
            message: contact_message(incident, sender_name, contact),
            location: incident.location,
            sent_to_police: false,
        })
        .collect();

    if incident.alert_type == AlertType::Sos {
        batch.push(NewAlert {
            incident_id: incident.id.clone(),
            contact_id: None,
            message: authority_message(incident, sender_name),
            location: incident.location,
            sent_to_police: true,
        });
    }

    batch
}
