//! In-memory application state over the persistent store.

use dashmap::DashMap;
use haven_core::{Clock, RiskZone, SystemClock, TimeBucket, ZoneSource};
use tracing::warn;

use crate::persistence::{self, Database};

/// Application state - zone cache, clock, and database handle shared by
/// all request handlers.
pub struct AppState {
    db: Database,
    zones: DashMap<String, RiskZone>,
    /// Consulted when the store holds no zones; injected, never compiled in.
    fallback: Box<dyn ZoneSource>,
    clock: Box<dyn Clock + Send + Sync>,
}

impl AppState {
    pub fn new(db: Database, fallback: Box<dyn ZoneSource>) -> Self {
        Self {
            db,
            zones: DashMap::new(),
            fallback,
            clock: Box::new(SystemClock),
        }
    }

    /// Replace the wall clock, for deterministic tests.
    pub fn with_clock(mut self, clock: Box<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn current_bucket(&self) -> TimeBucket {
        self.clock.current_bucket()
    }

    /// Warm the zone cache from the database.
    pub async fn load_from_database(&self) -> anyhow::Result<()> {
        let zones = persistence::zones::load_all_zones(self.db.pool()).await?;
        for zone in zones {
            self.zones.insert(zone.id.clone(), zone);
        }
        Ok(())
    }

    pub fn add_zone(&self, zone: RiskZone) {
        self.zones.insert(zone.id.clone(), zone);
    }

    pub fn get_zone(&self, id: &str) -> Option<RiskZone> {
        self.zones.get(id).map(|r| r.value().clone())
    }

    pub fn remove_zone(&self, id: &str) -> bool {
        self.zones.remove(id).is_some()
    }

    /// The zone set evaluations run against: the cached store, or the
    /// injected fallback while the store is empty. A failing fallback
    /// degrades to an empty set (and therefore a `Safe` evaluation).
    pub fn current_zones(&self) -> Vec<RiskZone> {
        if !self.zones.is_empty() {
            return self.zones.iter().map(|r| r.value().clone()).collect();
        }
        match self.fallback.fetch_zones() {
            Ok(zones) => zones,
            Err(e) => {
                warn!("fallback zone source failed: {}", e);
                Vec::new()
            }
        }
    }
}
