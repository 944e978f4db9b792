//! Risk zone persistence operations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use haven_core::{Coordinates, RiskZone, TimeOverrides};
use sqlx::SqlitePool;

use super::{parse_risk_level, risk_level_str};

/// Upsert a risk zone into the database.
pub async fn upsert_zone(pool: &SqlitePool, zone: &RiskZone) -> Result<()> {
    let overrides_json = serde_json::to_string(&zone.time_overrides)?;

    sqlx::query(
        r#"
        INSERT INTO risk_zones
            (id, name, description, center_lat, center_lon, radius_m,
             risk_score, risk_level, time_overrides, incident_count, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            name = ?2, description = ?3, center_lat = ?4, center_lon = ?5,
            radius_m = ?6, risk_score = ?7, risk_level = ?8,
            time_overrides = ?9, incident_count = ?10,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&zone.id)
    .bind(&zone.name)
    .bind(&zone.description)
    .bind(zone.center.lat)
    .bind(zone.center.lon)
    .bind(zone.radius_m)
    .bind(zone.risk_score)
    .bind(risk_level_str(zone.risk_level))
    .bind(&overrides_json)
    .bind(zone.incident_count)
    .bind(zone.created_at.to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load all risk zones from the database.
pub async fn load_all_zones(pool: &SqlitePool) -> Result<Vec<RiskZone>> {
    let rows = sqlx::query_as::<_, ZoneRow>(
        "SELECT id, name, description, center_lat, center_lon, radius_m, \
         risk_score, risk_level, time_overrides, incident_count, created_at FROM risk_zones",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

/// Delete a risk zone by ID.
pub async fn delete_zone(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM risk_zones WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Bump a zone's informational incident counter.
pub async fn increment_incident_count(pool: &SqlitePool, id: &str) -> Result<()> {
    sqlx::query("UPDATE risk_zones SET incident_count = incident_count + 1 WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct ZoneRow {
    id: String,
    name: Option<String>,
    description: Option<String>,
    center_lat: f64,
    center_lon: f64,
    radius_m: f64,
    risk_score: f64,
    risk_level: String,
    time_overrides: String,
    incident_count: i64,
    created_at: String,
}

impl TryFrom<ZoneRow> for RiskZone {
    type Error = anyhow::Error;

    fn try_from(row: ZoneRow) -> Result<Self> {
        let time_overrides: TimeOverrides =
            serde_json::from_str(&row.time_overrides).unwrap_or_default();
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(RiskZone {
            id: row.id,
            name: row.name,
            description: row.description,
            center: Coordinates::new(row.center_lat, row.center_lon),
            radius_m: row.radius_m,
            risk_score: row.risk_score,
            risk_level: parse_risk_level(&row.risk_level),
            time_overrides,
            incident_count: row.incident_count.max(0) as u32,
            created_at,
        })
    }
}
