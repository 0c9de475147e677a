//! REST implementations of the stat source traits.
//!
//! Requests gate scheduled batch progress, so the shared client carries an
//! aggressive timeout (low seconds) instead of reqwest's default.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fedtrust_core::FederationHistory;

use crate::error::StatsError;
use crate::traits::{FederationHistorySource, StatsLoader};

/// Base URLs of the collaborating services.
#[derive(Debug, Clone)]
pub struct StatsEndpoints {
    /// Monitoring service exposing aggregated availability metrics.
    pub monitoring_url: String,
    /// Anomaly detection service exposing per-platform misbehaviour reports.
    pub anomaly_url: String,
    /// Bartering service answering filtered transaction queries.
    pub bartering_url: String,
}

/// One aggregated metric row as returned by the monitoring service.
#[derive(Debug, Deserialize)]
struct AggregatedMetrics {
    statistics: HashMap<String, f64>,
}

/// Misbehaviour report for one platform.
#[derive(Debug, Deserialize)]
struct MisdeedsReport {
    total_misdeeds: u64,
}

/// Query body for the bartering service.
#[derive(Debug, Serialize)]
struct FilterRequest<'a> {
    platform: &'a str,
    begin_timestamp: i64,
    end_timestamp: i64,
}

/// One bartering transaction row; only the row count matters here.
#[derive(Debug, Deserialize)]
struct FilterResponse {
    #[allow(dead_code)]
    #[serde(default)]
    coupon_id: Option<String>,
}

/// REST-backed [`StatsLoader`].
pub struct RestStatsLoader {
    client: reqwest::Client,
    endpoints: StatsEndpoints,
}

impl RestStatsLoader {
    pub fn new(endpoints: StatsEndpoints, timeout: Duration) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    async fn fetch_availability(&self, resource_id: &str) -> Result<f64, StatsError> {
        let url = format!(
            "{}?metric=availability&operation=avg&device={}",
            self.endpoints.monitoring_url, resource_id
        );
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(StatsError::BadStatus {
                status: resp.status(),
                url,
            });
        }
        let metrics: Vec<AggregatedMetrics> = resp.json().await?;
        metrics
            .first()
            .and_then(|m| m.statistics.get("avg").copied())
            .ok_or(StatsError::EmptyResponse(url))
    }

    async fn fetch_anomaly_hits(&self, platform_id: &str) -> Result<u64, StatsError> {
        let url = format!("{}/{}", self.endpoints.anomaly_url, platform_id);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(StatsError::BadStatus {
                status: resp.status(),
                url,
            });
        }
        let report: MisdeedsReport = resp.json().await?;
        Ok(report.total_misdeeds)
    }

    async fn fetch_bartering_count(
        &self,
        platform_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StatsError> {
        let req = FilterRequest {
            platform: platform_id,
            begin_timestamp: since.timestamp_millis(),
            end_timestamp: Utc::now().timestamp_millis(),
        };
        let resp = self
            .client
            .post(&self.endpoints.bartering_url)
            .json(&req)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(StatsError::BadStatus {
                status: resp.status(),
                url: self.endpoints.bartering_url.clone(),
            });
        }
        let rows: Vec<FilterResponse> = resp.json().await?;
        Ok(rows.len() as u64)
    }
}

#[async_trait]
impl StatsLoader for RestStatsLoader {
    async fn resource_availability(&self, resource_id: &str) -> Option<f64> {
        match self.fetch_availability(resource_id).await {
            Ok(ratio) => Some(ratio),
            Err(e) => {
                tracing::warn!(resource_id, error = %e, "fetching availability stats failed");
                None
            }
        }
    }

    async fn platform_anomaly_hits(&self, platform_id: &str) -> Option<u64> {
        match self.fetch_anomaly_hits(platform_id).await {
            Ok(hits) => Some(hits),
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "fetching anomaly stats failed");
                None
            }
        }
    }

    async fn bartering_count(&self, platform_id: &str, since: DateTime<Utc>) -> Option<u64> {
        match self.fetch_bartering_count(platform_id, since).await {
            Ok(count) => Some(count),
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "fetching bartering stats failed");
                None
            }
        }
    }
}

/// Response envelope of the federation history service.
#[derive(Debug, Deserialize)]
struct HistoryResponse {
    events: Vec<FederationHistory>,
}

/// REST-backed [`FederationHistorySource`].
pub struct RestHistorySource {
    client: reqwest::Client,
    history_url: String,
}

impl RestHistorySource {
    pub fn new(history_url: String, timeout: Duration) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            history_url,
        })
    }

    async fn fetch(&self, platform_id: &str) -> Result<Vec<FederationHistory>, StatsError> {
        let url = format!("{}/{}", self.history_url, platform_id);
        let resp = self.client.get(&url).send().await?;
        if !resp.status().is_success() {
            return Err(StatsError::BadStatus {
                status: resp.status(),
                url,
            });
        }
        let body: HistoryResponse = resp.json().await?;
        Ok(body.events)
    }
}

#[async_trait]
impl FederationHistorySource for RestHistorySource {
    async fn fetch_history(&self, platform_id: &str) -> Vec<FederationHistory> {
        match self.fetch(platform_id).await {
            Ok(events) => {
                tracing::debug!(platform_id, count = events.len(), "fetched federation history");
                events
            }
            Err(e) => {
                tracing::warn!(platform_id, error = %e, "fetching federation history failed");
                Vec::new()
            }
        }
    }
}
