//! Zone source abstraction.

use thiserror::Error;

use crate::models::RiskZone;

#[derive(Debug, Error)]
pub enum ZoneSourceError {
    #[error("zone source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed zone data: {0}")]
    Malformed(String),
}

/// Where evaluation inputs come from.
///
/// The evaluator itself never fetches; callers resolve a zone set through
/// this trait so tests and the fallback path can inject fixtures instead
/// of a live store. An empty result is valid and evaluates to `Safe`.
pub trait ZoneSource: Send + Sync {
    fn fetch_zones(&self) -> Result<Vec<RiskZone>, ZoneSourceError>;
}

/// A fixed in-memory zone set, used for fallback defaults and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticZones {
    zones: Vec<RiskZone>,
}

impl StaticZones {
    pub fn new(zones: Vec<RiskZone>) -> Self {
        Self { zones }
    }

    /// Parse a zone set from JSON, the format the seed file uses.
    pub fn from_json(json: &str) -> Result<Self, ZoneSourceError> {
        let zones: Vec<RiskZone> =
            serde_json::from_str(json).map_err(|e| ZoneSourceError::Malformed(e.to_string()))?;
        Ok(Self { zones })
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

impl ZoneSource for StaticZones {
    fn fetch_zones(&self) -> Result<Vec<RiskZone>, ZoneSourceError> {
        Ok(self.zones.clone())
    }
}
