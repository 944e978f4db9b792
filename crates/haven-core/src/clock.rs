//! Time-of-day bucketing with an injectable clock.

use chrono::{DateTime, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::RiskZone;

/// Hour at which the night bucket begins (inclusive).
pub const NIGHT_START_HOUR: u32 = 18;
/// Hour at which the night bucket ends (exclusive).
pub const NIGHT_END_HOUR: u32 = 6;

/// Day/night bucket derived from local wall-clock hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Day,
    Night,
}

impl TimeBucket {
    /// Bucket a local hour (0..24). Night is 18:00-05:59.
    pub fn from_hour(hour: u32) -> Self {
        if hour >= NIGHT_START_HOUR || hour < NIGHT_END_HOUR {
            TimeBucket::Night
        } else {
            TimeBucket::Day
        }
    }

    pub fn from_local(time: DateTime<Local>) -> Self {
        Self::from_hour(time.hour())
    }

    /// Wire/storage label for this bucket.
    pub fn label(&self) -> &'static str {
        match self {
            TimeBucket::Day => "day",
            TimeBucket::Night => "night",
        }
    }
}

/// Resolve a zone's score for a bucket: per-bucket override if set,
/// otherwise the zone's base risk score.
pub fn weighted_score(zone: &RiskZone, bucket: TimeBucket) -> f64 {
    let override_score = match bucket {
        TimeBucket::Day => zone.time_overrides.day,
        TimeBucket::Night => zone.time_overrides.night,
    };
    override_score.unwrap_or(zone.risk_score)
}

/// Source of wall-clock time for evaluation.
///
/// The evaluator never reads the system clock directly; production code
/// injects [`SystemClock`], tests inject [`FixedClock`].
pub trait Clock {
    fn current_bucket(&self) -> TimeBucket;
}

/// Real wall-clock time in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_bucket(&self) -> TimeBucket {
        TimeBucket::from_local(Local::now())
    }
}

/// A clock pinned to one bucket, for deterministic tests and offline runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeBucket);

impl Clock for FixedClock {
    fn current_bucket(&self) -> TimeBucket {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, RiskLevel, RiskZone, TimeOverrides};
    use chrono::Utc;

    fn zone_with_overrides(base: f64, overrides: TimeOverrides) -> RiskZone {
        RiskZone {
            id: "z1".to_string(),
            name: None,
            description: None,
            center: Coordinates::new(0.0, 0.0),
            radius_m: 100.0,
            risk_score: base,
            risk_level: RiskLevel::AtRisk,
            time_overrides: overrides,
            incident_count: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(0), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(6), TimeBucket::Day);
        assert_eq!(TimeBucket::from_hour(12), TimeBucket::Day);
        assert_eq!(TimeBucket::from_hour(17), TimeBucket::Day);
        assert_eq!(TimeBucket::from_hour(18), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(23), TimeBucket::Night);
    }

    #[test]
    fn test_weighted_score_uses_override() {
        let zone = zone_with_overrides(
            0.5,
            TimeOverrides {
                day: None,
                night: Some(0.9),
            },
        );
        assert_eq!(weighted_score(&zone, TimeBucket::Night), 0.9);
        assert_eq!(weighted_score(&zone, TimeBucket::Day), 0.5);
    }

    #[test]
    fn test_weighted_score_falls_back_to_base() {
        let zone = zone_with_overrides(0.4, TimeOverrides::default());
        assert_eq!(weighted_score(&zone, TimeBucket::Day), 0.4);
        assert_eq!(weighted_score(&zone, TimeBucket::Night), 0.4);
    }

    #[test]
    fn test_bucket_labels() {
        assert_eq!(TimeBucket::Day.label(), "day");
        assert_eq!(TimeBucket::Night.label(), "night");
    }
}
