//! Haven CLI - operator tools for the safety backend.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use haven_core::{evaluate_at, nearby_zone_count, Coordinates, StaticZones, TimeBucket, ZoneSource};
use haven_sdk::HavenClient;
use serde_json::json;

#[derive(Parser)]
#[command(name = "haven", about = "Haven safety backend tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a location offline against a zone fixture file
    Evaluate {
        /// Path to a JSON file with an array of risk zones
        #[arg(long)]
        zones: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Fixed evaluation time (RFC3339); defaults to now
        #[arg(long)]
        at: Option<String>,
    },
    /// Evaluate a location through the server endpoint
    Check {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        /// Evaluate on behalf of a user (may trigger auto-alerts)
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Trigger an SOS incident
    Sos {
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        lat: f64,
        #[arg(long)]
        lon: f64,
        #[arg(long)]
        description: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Evaluate {
            zones,
            lat,
            lon,
            at,
        } => evaluate_offline(&zones, lat, lon, at.as_deref(), cli.json),
        Command::Check {
            server,
            lat,
            lon,
            user_id,
        } => check_remote(&server, lat, lon, user_id.as_deref(), cli.json).await,
        Command::Sos {
            server,
            user_id,
            lat,
            lon,
            description,
        } => trigger_sos(&server, &user_id, lat, lon, description.as_deref(), cli.json).await,
    }
}

fn evaluate_offline(
    zones_path: &str,
    lat: f64,
    lon: f64,
    at: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(zones_path)
        .with_context(|| format!("reading zones from {zones_path}"))?;
    let source = StaticZones::from_json(&content)?;
    let zones = source.fetch_zones()?;

    let bucket = match at {
        Some(s) => {
            let time: DateTime<Local> = s
                .parse()
                .with_context(|| format!("parsing --at time '{s}'"))?;
            TimeBucket::from_local(time)
        }
        None => TimeBucket::from_local(Local::now()),
    };

    let point = Coordinates::new(lat, lon);
    let eval = evaluate_at(point, &zones, bucket);

    if as_json {
        println!(
            "{}",
            json!({
                "risk_level": eval.level,
                "risk_score": eval.score,
                "in_risk_zone": eval.inside,
                "zone_id": eval.zone.map(|z| z.id.clone()),
                "zone_name": eval.zone.and_then(|z| z.name.clone()),
                "nearby_zones": nearby_zone_count(point, &zones),
                "time_bucket": bucket.label(),
            })
        );
    } else {
        println!(
            "{:?} (score {:.2}, {} bucket) - {}",
            eval.level,
            eval.score,
            bucket.label(),
            match eval.zone {
                Some(zone) if eval.inside => format!("inside '{}'", zone.display_name()),
                Some(zone) => format!("approaching '{}'", zone.display_name()),
                None => "no zone nearby".to_string(),
            }
        );
    }
    Ok(())
}

async fn check_remote(
    server: &str,
    lat: f64,
    lon: f64,
    user_id: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let client = HavenClient::new(server);
    let result = client.evaluate(lat, lon, user_id).await?;

    if as_json {
        println!(
            "{}",
            json!({
                "risk_level": result.risk_level,
                "risk_score": result.risk_score,
                "in_risk_zone": result.in_risk_zone,
                "zone_name": result.zone_name,
                "zone_description": result.zone_description,
                "nearby_zones": result.nearby_zones,
            })
        );
    } else {
        println!(
            "{:?} (score {:.2}) - in zone: {}, nearby zones: {}",
            result.risk_level,
            result.risk_score,
            result.in_risk_zone,
            result.nearby_zones
        );
    }
    Ok(())
}

async fn trigger_sos(
    server: &str,
    user_id: &str,
    lat: f64,
    lon: f64,
    description: Option<&str>,
    as_json: bool,
) -> Result<()> {
    let client = HavenClient::new(server);
    let outcome = client.trigger_sos(user_id, lat, lon, description).await?;

    if as_json {
        println!(
            "{}",
            json!({
                "incident_id": outcome.incident.id,
                "alerts_sent": outcome.alerts_sent,
            })
        );
    } else {
        println!(
            "SOS raised: incident {} ({} alerts sent)",
            outcome.incident.id, outcome.alerts_sent
        );
    }
    Ok(())
}
