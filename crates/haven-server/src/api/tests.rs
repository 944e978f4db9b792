use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use haven_core::{FixedClock, StaticZones, TimeBucket};

use crate::{api, persistence, state::AppState};

async fn setup_app() -> (axum::Router, Arc<AppState>) {
    setup_app_with_fallback(StaticZones::default()).await
}

async fn setup_app_with_fallback(fallback: StaticZones) -> (axum::Router, Arc<AppState>) {
    let db_path = std::env::temp_dir()
        .join(format!("haven-test-{}.db", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .to_string();

    let db = persistence::init_database(&db_path, 2).await.expect("init db");
    let state = Arc::new(
        AppState::new(db, Box::new(fallback))
            .with_clock(Box::new(FixedClock(TimeBucket::Day))),
    );
    state.load_from_database().await.expect("load db");

    let app = api::routes().with_state(state.clone());
    (app, state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("parse json")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn zone_body(name: &str, lat: f64, lon: f64, radius_m: f64, score: f64, level: &str) -> Value {
    json!({
        "name": name,
        "description": format!("{name} test area"),
        "center": { "lat": lat, "lon": lon },
        "radius_m": radius_m,
        "risk_score": score,
        "risk_level": level
    })
}

#[tokio::test]
async fn zone_crud_round_trip() {
    let (app, _state) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/zones",
            zone_body("Old harbor", 40.7128, -74.0060, 800.0, 0.6, "at_risk"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let zone_id = created["id"].as_str().unwrap().to_string();

    let response = app.clone().oneshot(get("/v1/zones")).await.unwrap();
    let listed = read_json(response).await;
    assert!(listed
        .as_array()
        .unwrap()
        .iter()
        .any(|z| z["id"].as_str() == Some(zone_id.as_str())));

    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/v1/zones/{zone_id}"),
            json!({ "risk_score": 0.9, "risk_level": "emergency" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let updated = read_json(response).await;
    assert_eq!(updated["risk_level"].as_str(), Some("emergency"));
    // Untouched fields survive partial updates.
    assert_eq!(updated["name"].as_str(), Some("Old harbor"));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/v1/zones/{zone_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get(&format!("/v1/zones/{zone_id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn evaluate_with_no_zones_is_safe() {
    let (app, _state) = setup_app().await;

    let response = app
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["risk_level"].as_str(), Some("safe"));
    assert_eq!(body["risk_score"].as_f64(), Some(0.0));
    assert_eq!(body["in_risk_zone"].as_bool(), Some(false));
    assert!(body["zone_name"].is_null());
    assert_eq!(body["nearby_zones"].as_u64(), Some(0));
}

#[tokio::test]
async fn evaluate_inside_zone() {
    let (app, _state) = setup_app().await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/zones",
            zone_body("Dock district", 40.7128, -74.0060, 1000.0, 0.7, "at_risk"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060 }),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["risk_level"].as_str(), Some("at_risk"));
    assert_eq!(body["risk_score"].as_f64(), Some(0.7));
    assert_eq!(body["in_risk_zone"].as_bool(), Some(true));
    assert_eq!(body["zone_name"].as_str(), Some("Dock district"));
    assert_eq!(body["nearby_zones"].as_u64(), Some(1));
}

#[tokio::test]
async fn evaluate_uses_fallback_zones_when_store_empty() {
    let fallback = StaticZones::from_json(
        r#"[{
            "id": "seed-1",
            "name": "Seed zone",
            "center": { "lat": 40.7128, "lon": -74.0060 },
            "radius_m": 1000.0,
            "risk_score": 0.7,
            "risk_level": "at_risk",
            "created_at": "2025-01-01T00:00:00Z"
        }]"#,
    )
    .expect("seed json");
    let (app, _state) = setup_app_with_fallback(fallback).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060 }),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["risk_level"].as_str(), Some("at_risk"));
    assert_eq!(body["zone_name"].as_str(), Some("Seed zone"));

    // A stored zone supersedes the fallback set.
    app.clone()
        .oneshot(post_json(
            "/v1/zones",
            zone_body("Real zone", 10.0, 10.0, 500.0, 0.5, "at_risk"),
        ))
        .await
        .unwrap();
    let response = app
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060 }),
        ))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["risk_level"].as_str(), Some("safe"));
}

async fn setup_user(app: &axum::Router, user_id: &str, auto_alert: bool) {
    let response = app
        .clone()
        .oneshot(put_json(
            &format!("/v1/users/{user_id}/preferences"),
            json!({ "auto_alert_on_risk_zone": auto_alert }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/v1/users/{user_id}/contacts"),
            json!({ "name": "Ana", "phone": "+15550100" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn auto_alert_fires_inside_emergency_zone() {
    let (app, _state) = setup_app().await;
    setup_user(&app, "user-1", true).await;

    app.clone()
        .oneshot(post_json(
            "/v1/zones",
            zone_body("Blackout block", 40.7128, -74.0060, 1000.0, 0.9, "emergency"),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060, "user_id": "user-1" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["risk_level"].as_str(), Some("emergency"));
    assert_eq!(body["in_risk_zone"].as_bool(), Some(true));

    let response = app
        .clone()
        .oneshot(get("/v1/incidents?user_id=user-1"))
        .await
        .unwrap();
    let incidents = read_json(response).await;
    let incidents = incidents.as_array().unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0]["alert_type"].as_str(), Some("risk_zone_entry"));
    assert_eq!(incidents[0]["status"].as_str(), Some("pending"));
    assert_eq!(incidents[0]["risk_level"].as_str(), Some("emergency"));
    let incident_id = incidents[0]["id"].as_str().unwrap();

    // Contact alerts only: automatic zone entry never notifies authorities.
    let response = app
        .clone()
        .oneshot(get(&format!("/v1/incidents/{incident_id}/alerts")))
        .await
        .unwrap();
    let alerts = read_json(response).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["sent_to_police"].as_bool(), Some(false));
    assert!(alerts[0]["contact_id"].as_str().is_some());
    assert!(alerts[0]["message"].as_str().unwrap().contains("Blackout block"));
}

#[tokio::test]
async fn auto_alert_suppressed_without_opt_in() {
    let (app, _state) = setup_app().await;
    setup_user(&app, "user-2", false).await;

    app.clone()
        .oneshot(post_json(
            "/v1/zones",
            zone_body("Blackout block", 40.7128, -74.0060, 1000.0, 0.9, "emergency"),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060, "user_id": "user-2" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(get("/v1/incidents?user_id=user-2"))
        .await
        .unwrap();
    let incidents = read_json(response).await;
    assert!(incidents.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn auto_alert_suppressed_below_emergency() {
    let (app, _state) = setup_app().await;
    setup_user(&app, "user-3", true).await;

    app.clone()
        .oneshot(post_json(
            "/v1/zones",
            zone_body("Old harbor", 40.7128, -74.0060, 1000.0, 0.7, "at_risk"),
        ))
        .await
        .unwrap();

    app.clone()
        .oneshot(post_json(
            "/v1/risk/evaluate",
            json!({ "latitude": 40.7128, "longitude": -74.0060, "user_id": "user-3" }),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(get("/v1/incidents?user_id=user-3"))
        .await
        .unwrap();
    let incidents = read_json(response).await;
    assert!(incidents.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn sos_creates_incident_and_authority_alert() {
    let (app, _state) = setup_app().await;
    setup_user(&app, "user-4", false).await;

    let response = app
        .clone()
        .oneshot(post_json(
            "/v1/sos",
            json!({
                "user_id": "user-4",
                "latitude": 40.7128,
                "longitude": -74.0060,
                "description": "need help"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(body["incident"]["alert_type"].as_str(), Some("sos"));
    assert_eq!(body["incident"]["status"].as_str(), Some("active"));
    // One contact plus the authority alert.
    assert_eq!(body["alerts_sent"].as_u64(), Some(2));
    let incident_id = body["incident"]["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get(&format!("/v1/incidents/{incident_id}/alerts")))
        .await
        .unwrap();
    let alerts = read_json(response).await;
    let alerts = alerts.as_array().unwrap();
    assert_eq!(alerts.len(), 2);
    let police: Vec<_> = alerts
        .iter()
        .filter(|a| a["sent_to_police"].as_bool() == Some(true))
        .collect();
    assert_eq!(police.len(), 1);
    assert!(police[0]["contact_id"].is_null());
}
