//! Shared fixtures for the fedtrust integration tests: configurable stub
//! collaborators standing in for the external statistics services.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fedtrust_bus::TrustPublisher;
use fedtrust_core::events::TrustUpdate;
use fedtrust_core::FederationHistory;
use fedtrust_stats::{FederationHistorySource, StatsLoader};

/// Stats loader answering with fixed signals. `None` fields model the
/// collaborating service being unreachable.
#[derive(Default)]
pub struct StubStats {
    pub availability: Mutex<Option<f64>>,
    pub anomaly_hits: Option<u64>,
    pub bartering: Option<u64>,
}

impl StubStats {
    pub fn with_availability(ratio: f64) -> Self {
        Self {
            availability: Mutex::new(Some(ratio)),
            ..Default::default()
        }
    }

    /// Change the availability signal mid-test.
    pub fn set_availability(&self, ratio: Option<f64>) {
        *self.availability.lock().unwrap() = ratio;
    }
}

#[async_trait]
impl StatsLoader for StubStats {
    async fn resource_availability(&self, _resource_id: &str) -> Option<f64> {
        *self.availability.lock().unwrap()
    }

    async fn platform_anomaly_hits(&self, _platform_id: &str) -> Option<u64> {
        self.anomaly_hits
    }

    async fn bartering_count(&self, _platform_id: &str, _since: DateTime<Utc>) -> Option<u64> {
        self.bartering
    }
}

/// History source returning a fixed interval list.
#[derive(Default)]
pub struct StubHistory {
    pub events: Vec<FederationHistory>,
}

#[async_trait]
impl FederationHistorySource for StubHistory {
    async fn fetch_history(&self, _platform_id: &str) -> Vec<FederationHistory> {
        self.events.clone()
    }
}

/// Publisher that records every update it is handed.
#[derive(Default)]
pub struct RecordingPublisher {
    updates: Mutex<Vec<TrustUpdate>>,
}

impl RecordingPublisher {
    pub fn take(&self) -> Vec<TrustUpdate> {
        std::mem::take(&mut *self.updates.lock().unwrap())
    }

    pub fn count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

#[async_trait]
impl TrustPublisher for RecordingPublisher {
    async fn publish(&self, update: TrustUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}
