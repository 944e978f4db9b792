//! Zone risk evaluation.
//!
//! The same evaluation runs at two call sites: the live-tracking client
//! re-runs it on every location update, and the server runs it once per
//! evaluate request before the auto-alert decision. Both must produce
//! identical results given identical inputs.

use crate::clock::{weighted_score, Clock, TimeBucket};
use crate::models::{Coordinates, RiskLevel, RiskZone};
use crate::spatial::distance_m;

/// A point outside a zone but within this multiple of its radius counts
/// as approaching it.
pub const APPROACH_RADIUS_FACTOR: f64 = 1.5;
/// An approaching zone contributes half its base score.
pub const APPROACH_SCORE_FACTOR: f64 = 0.5;

/// Outcome of evaluating a point against a zone set.
///
/// The selected zone borrows from the zone slice passed to the evaluator,
/// so a result never outlives its inputs.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub level: RiskLevel,
    pub score: f64,
    pub zone: Option<&'a RiskZone>,
    /// True when the point is contained in the selected zone; gates the
    /// server-side auto-alert decision.
    pub inside: bool,
}

impl Default for Evaluation<'_> {
    fn default() -> Self {
        Self {
            level: RiskLevel::Safe,
            score: 0.0,
            zone: None,
            inside: false,
        }
    }
}

/// Evaluate a point against a zone set for a fixed time bucket.
///
/// Containment dominates approach: among contained zones the highest
/// time-weighted score wins (strict `>` against the running maximum keeps
/// the level/score order-independent; the first zone to reach a score
/// wins ties). An approaching zone may only lift a result that is still
/// `Safe` - it never overrides a containment or an earlier approach, even
/// with a numerically higher score, to keep weak distance signals from
/// flapping the displayed level.
///
/// Zone fields are not validated here; a non-positive radius simply never
/// matches. An empty zone set returns the `Safe` default.
pub fn evaluate_at<'a>(
    point: Coordinates,
    zones: &'a [RiskZone],
    bucket: TimeBucket,
) -> Evaluation<'a> {
    let mut result = Evaluation::default();

    for zone in zones {
        let dist = distance_m(point, zone.center);

        if dist <= zone.radius_m {
            let score = weighted_score(zone, bucket);
            if score > result.score {
                result = Evaluation {
                    level: zone.risk_level,
                    score,
                    zone: Some(zone),
                    inside: true,
                };
            }
        } else if dist <= zone.radius_m * APPROACH_RADIUS_FACTOR {
            let approaching_score = zone.risk_score * APPROACH_SCORE_FACTOR;
            if approaching_score > result.score && result.level == RiskLevel::Safe {
                result = Evaluation {
                    level: RiskLevel::AtRisk,
                    score: approaching_score,
                    zone: Some(zone),
                    inside: false,
                };
            }
        }
    }

    result
}

/// Count zones whose center lies within the approach band of the point
/// (distance at most 1.5x radius). Reported as `nearby_zones` by the
/// server endpoint.
pub fn nearby_zone_count(point: Coordinates, zones: &[RiskZone]) -> usize {
    zones
        .iter()
        .filter(|zone| distance_m(point, zone.center) <= zone.radius_m * APPROACH_RADIUS_FACTOR)
        .count()
}

/// Evaluator bound to a clock, resolving the time bucket per call.
#[derive(Debug, Clone, Default)]
pub struct RiskEvaluator<C: Clock> {
    clock: C,
}

impl<C: Clock> RiskEvaluator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn evaluate<'a>(&self, point: Coordinates, zones: &'a [RiskZone]) -> Evaluation<'a> {
        evaluate_at(point, zones, self.clock.current_bucket())
    }
}
