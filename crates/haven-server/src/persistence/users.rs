//! User preference and emergency contact persistence.

use anyhow::Result;
use haven_core::{EmergencyContact, UserPreferences};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Load a user's preferences; users who never saved any get defaults
/// (auto-alerting off).
pub async fn get_preferences(pool: &SqlitePool, user_id: &str) -> Result<UserPreferences> {
    let row = sqlx::query_as::<_, PreferencesRow>(
        "SELECT user_id, auto_alert_on_risk_zone, share_location_with_contacts \
         FROM user_preferences WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row
        .map(UserPreferences::from)
        .unwrap_or_else(|| UserPreferences::default_for(user_id)))
}

/// Upsert a user's preferences.
pub async fn set_preferences(pool: &SqlitePool, prefs: &UserPreferences) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_preferences (user_id, auto_alert_on_risk_zone, share_location_with_contacts, updated_at)
        VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
        ON CONFLICT(user_id) DO UPDATE SET
            auto_alert_on_risk_zone = ?2, share_location_with_contacts = ?3,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&prefs.user_id)
    .bind(prefs.auto_alert_on_risk_zone)
    .bind(prefs.share_location_with_contacts)
    .execute(pool)
    .await?;

    Ok(())
}

/// List a user's emergency contacts ordered by priority.
pub async fn get_contacts(pool: &SqlitePool, user_id: &str) -> Result<Vec<EmergencyContact>> {
    let rows = sqlx::query_as::<_, ContactRow>(
        "SELECT id, user_id, name, phone, email, priority \
         FROM emergency_contacts WHERE user_id = ?1 ORDER BY priority ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(EmergencyContact::from).collect())
}

/// Add an emergency contact, assigning its id.
pub async fn add_contact(
    pool: &SqlitePool,
    user_id: &str,
    name: String,
    phone: String,
    email: Option<String>,
    priority: u32,
) -> Result<EmergencyContact> {
    let contact = EmergencyContact {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        name,
        phone,
        email,
        priority,
    };

    sqlx::query(
        "INSERT INTO emergency_contacts (id, user_id, name, phone, email, priority) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&contact.id)
    .bind(&contact.user_id)
    .bind(&contact.name)
    .bind(&contact.phone)
    .bind(&contact.email)
    .bind(contact.priority)
    .execute(pool)
    .await?;

    Ok(contact)
}

#[derive(sqlx::FromRow)]
struct PreferencesRow {
    user_id: String,
    auto_alert_on_risk_zone: bool,
    share_location_with_contacts: bool,
}

impl From<PreferencesRow> for UserPreferences {
    fn from(row: PreferencesRow) -> Self {
        UserPreferences {
            user_id: row.user_id,
            auto_alert_on_risk_zone: row.auto_alert_on_risk_zone,
            share_location_with_contacts: row.share_location_with_contacts,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContactRow {
    id: String,
    user_id: String,
    name: String,
    phone: String,
    email: Option<String>,
    priority: i64,
}

impl From<ContactRow> for EmergencyContact {
    fn from(row: ContactRow) -> Self {
        EmergencyContact {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            priority: row.priority.max(0) as u32,
        }
    }
}
