pub mod alerting;
pub mod clock;
pub mod evaluator;
pub mod models;
pub mod spatial;
pub mod zones;

pub use alerting::{build_alert_batch, should_auto_alert, NewAlert, NewIncident};
pub use clock::{weighted_score, Clock, FixedClock, SystemClock, TimeBucket};
pub use evaluator::{
    evaluate_at, nearby_zone_count, Evaluation, RiskEvaluator, APPROACH_RADIUS_FACTOR,
    APPROACH_SCORE_FACTOR,
};
pub use models::{
    Alert, AlertType, Coordinates, CreateZoneRequest, EmergencyContact, Incident, IncidentStatus,
    RiskLevel, RiskZone, TimeOverrides, UpdateZoneRequest, UserPreferences,
};
pub use spatial::haversine_distance;
pub use zones::{StaticZones, ZoneSource, ZoneSourceError};
