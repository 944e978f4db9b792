//! Incident and alert persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use haven_core::alerting::{NewAlert, NewIncident};
use haven_core::{Alert, Coordinates, Incident};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{
    alert_type_str, incident_status_str, parse_alert_type, parse_incident_status,
    parse_risk_level, risk_level_str,
};

/// Persist a new incident, assigning its id and timestamp.
pub async fn create_incident(pool: &SqlitePool, new: NewIncident) -> Result<Incident> {
    let incident = new.into_incident(Uuid::new_v4().to_string(), Utc::now());

    sqlx::query(
        r#"
        INSERT INTO incidents
            (id, user_id, lat, lon, alert_type, status, risk_level, description, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&incident.id)
    .bind(&incident.user_id)
    .bind(incident.location.lat)
    .bind(incident.location.lon)
    .bind(alert_type_str(incident.alert_type))
    .bind(incident_status_str(incident.status))
    .bind(risk_level_str(incident.risk_level))
    .bind(&incident.description)
    .bind(incident.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(incident)
}

/// Persist an alert batch in a single transaction.
pub async fn create_alerts(pool: &SqlitePool, batch: Vec<NewAlert>) -> Result<Vec<Alert>> {
    let mut tx = pool.begin().await?;
    let mut alerts = Vec::with_capacity(batch.len());

    for new in batch {
        let alert = new.into_alert(Uuid::new_v4().to_string(), Utc::now());
        sqlx::query(
            r#"
            INSERT INTO alerts
                (id, incident_id, contact_id, message, lat, lon, sent_to_police, delivered, sent_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&alert.id)
        .bind(&alert.incident_id)
        .bind(&alert.contact_id)
        .bind(&alert.message)
        .bind(alert.location.lat)
        .bind(alert.location.lon)
        .bind(alert.sent_to_police)
        .bind(alert.delivered)
        .bind(alert.sent_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;
        alerts.push(alert);
    }

    tx.commit().await?;
    Ok(alerts)
}

/// List a user's incidents, newest first.
pub async fn list_incidents(pool: &SqlitePool, user_id: &str) -> Result<Vec<Incident>> {
    let rows = sqlx::query_as::<_, IncidentRow>(
        "SELECT id, user_id, lat, lon, alert_type, status, risk_level, description, \
         created_at, resolved_at FROM incidents WHERE user_id = ?1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Incident::from).collect())
}

/// Load the alerts belonging to one incident.
pub async fn list_alerts(pool: &SqlitePool, incident_id: &str) -> Result<Vec<Alert>> {
    let rows = sqlx::query_as::<_, AlertRow>(
        "SELECT id, incident_id, contact_id, message, lat, lon, sent_to_police, delivered, \
         sent_at FROM alerts WHERE incident_id = ?1",
    )
    .bind(incident_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Alert::from).collect())
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[derive(sqlx::FromRow)]
struct IncidentRow {
    id: String,
    user_id: String,
    lat: f64,
    lon: f64,
    alert_type: String,
    status: String,
    risk_level: String,
    description: Option<String>,
    created_at: String,
    resolved_at: Option<String>,
}

impl From<IncidentRow> for Incident {
    fn from(row: IncidentRow) -> Self {
        Incident {
            id: row.id,
            user_id: row.user_id,
            location: Coordinates::new(row.lat, row.lon),
            alert_type: parse_alert_type(&row.alert_type),
            status: parse_incident_status(&row.status),
            risk_level: parse_risk_level(&row.risk_level),
            description: row.description,
            created_at: parse_timestamp(&row.created_at),
            resolved_at: row.resolved_at.as_deref().map(parse_timestamp),
        }
    }
}

#[derive(sqlx::FromRow)]
struct AlertRow {
    id: String,
    incident_id: String,
    contact_id: Option<String>,
    message: String,
    lat: f64,
    lon: f64,
    sent_to_police: bool,
    delivered: bool,
    sent_at: String,
}

impl From<AlertRow> for Alert {
    fn from(row: AlertRow) -> Self {
        Alert {
            id: row.id,
            incident_id: row.incident_id,
            contact_id: row.contact_id,
            message: row.message,
            location: Coordinates::new(row.lat, row.lon),
            sent_to_police: row.sent_to_police,
            delivered: row.delivered,
            sent_at: parse_timestamp(&row.sent_at),
        }
    }
}
