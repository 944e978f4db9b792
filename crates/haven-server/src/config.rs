//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Optional JSON file with fallback zones used while the store is empty.
    pub seed_zones_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env::var("HAVEN_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3000),
            database_path: env::var("HAVEN_DB_PATH")
                .unwrap_or_else(|_| "data/haven.db".to_string()),
            database_max_connections: env::var("HAVEN_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            seed_zones_path: env::var("HAVEN_SEED_ZONES").ok(),
        }
    }
}
