//! Client-side live risk monitoring.
//!
//! Runs the same evaluator as the server against a locally held zone set,
//! once per accepted location update. Each update fully supersedes the
//! previous evaluation; there is no queued backlog.

use haven_core::{Clock, Coordinates, RiskEvaluator, RiskLevel, RiskZone};

/// What the UI should render for the current location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Safe,
    /// Near a zone but not inside it
    Approaching,
    /// Contained in a zone; suppresses the approaching presentation
    Inside,
}

/// Snapshot of the latest evaluation, owned so the UI can hold it past
/// the next zone refresh.
#[derive(Debug, Clone)]
pub struct MonitorStatus {
    pub level: RiskLevel,
    pub score: f64,
    pub zone_id: Option<String>,
    pub zone_name: Option<String>,
    pub inside: bool,
    /// Set when this update changed the risk level.
    pub transition: Option<LevelChange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub from: RiskLevel,
    pub to: RiskLevel,
}

impl MonitorStatus {
    pub fn display_state(&self) -> DisplayState {
        if self.inside {
            DisplayState::Inside
        } else if self.level != RiskLevel::Safe {
            DisplayState::Approaching
        } else {
            DisplayState::Safe
        }
    }
}

/// Live evaluator over a locally cached zone set.
pub struct LiveMonitor<C: Clock> {
    zones: Vec<RiskZone>,
    evaluator: RiskEvaluator<C>,
    last_level: RiskLevel,
}

impl<C: Clock> LiveMonitor<C> {
    pub fn new(clock: C) -> Self {
        Self {
            zones: Vec::new(),
            evaluator: RiskEvaluator::new(clock),
            last_level: RiskLevel::Safe,
        }
    }

    /// Replace the cached zone set, e.g. after a fetch from the server.
    pub fn set_zones(&mut self, zones: Vec<RiskZone>) {
        self.zones = zones;
    }

    pub fn zones(&self) -> &[RiskZone] {
        &self.zones
    }

    /// Evaluate a new location fix and report the resulting status.
    pub fn update(&mut self, latitude: f64, longitude: f64) -> MonitorStatus {
        let point = Coordinates::new(latitude, longitude);
        let eval = self.evaluator.evaluate(point, &self.zones);

        let transition = (eval.level != self.last_level).then_some(LevelChange {
            from: self.last_level,
            to: eval.level,
        });
        if let Some(change) = transition {
            tracing::debug!("risk level changed: {:?} -> {:?}", change.from, change.to);
        }
        self.last_level = eval.level;

        MonitorStatus {
            level: eval.level,
            score: eval.score,
            zone_id: eval.zone.map(|z| z.id.clone()),
            zone_name: eval.zone.and_then(|z| z.name.clone()),
            inside: eval.inside,
            transition,
        }
    }
}
