//! HTTP client for the Haven server API.

use anyhow::{anyhow, Result};
use haven_core::{Incident, RiskLevel, RiskZone};
use serde::{Deserialize, Serialize};

/// Client for the Haven safety backend.
pub struct HavenClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct EvaluateRequest<'a> {
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
}

/// Server-side evaluation result.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteEvaluation {
    pub risk_level: RiskLevel,
    pub risk_score: f64,
    pub in_risk_zone: bool,
    pub zone_name: Option<String>,
    pub zone_description: Option<String>,
    pub nearby_zones: usize,
}

#[derive(Debug, Serialize)]
struct SosRequest<'a> {
    user_id: &'a str,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SosOutcome {
    pub incident: Incident,
    pub alerts_sent: usize,
}

impl HavenClient {
    /// Create a new client against a server base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Evaluate a location server-side. With a `user_id` the server may
    /// additionally raise an auto-alert incident.
    pub async fn evaluate(
        &self,
        latitude: f64,
        longitude: f64,
        user_id: Option<&str>,
    ) -> Result<RemoteEvaluation> {
        let url = format!("{}/v1/risk/evaluate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&EvaluateRequest {
                latitude,
                longitude,
                user_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("evaluate failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// Trigger an SOS incident.
    pub async fn trigger_sos(
        &self,
        user_id: &str,
        latitude: f64,
        longitude: f64,
        description: Option<&str>,
    ) -> Result<SosOutcome> {
        let url = format!("{}/v1/sos", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SosRequest {
                user_id,
                latitude,
                longitude,
                description,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("sos failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// Fetch the current zone set for local evaluation.
    ///
    /// A failure here is recoverable: callers fall back to an empty zone
    /// set, which evaluates to `Safe`.
    pub async fn fetch_zones(&self) -> Result<Vec<RiskZone>> {
        let url = format!("{}/v1/zones", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!("zone fetch failed: {}", response.status()));
        }
        Ok(response.json().await?)
    }
}
