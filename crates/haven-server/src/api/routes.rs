//! REST API routes.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::{incidents, risk, sos, users, zones};
use crate::state::AppState;

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/v1/risk/evaluate", post(risk::evaluate))
        .route("/v1/sos", post(sos::trigger_sos))
        .route("/v1/zones", post(zones::create_zone))
        .route("/v1/zones", get(zones::list_zones))
        .route("/v1/zones/:id", get(zones::get_zone))
        .route("/v1/zones/:id", put(zones::update_zone))
        .route("/v1/zones/:id", delete(zones::delete_zone))
        .route("/v1/incidents", get(incidents::list_incidents))
        .route("/v1/incidents/:id/alerts", get(incidents::list_alerts))
        .route("/v1/users/:id/preferences", put(users::set_preferences))
        .route("/v1/users/:id/contacts", post(users::add_contact))
        .route("/v1/users/:id/contacts", get(users::list_contacts))
}
