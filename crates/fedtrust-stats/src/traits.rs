use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fedtrust_core::FederationHistory;

/// Raw external signals consumed by the scoring formulas.
///
/// All methods return `None` when the signal is unavailable for any reason;
/// the contract is "absent, never an error".
#[async_trait]
pub trait StatsLoader: Send + Sync {
    /// Average availability of the resource as a ratio in `[0, 1]`.
    async fn resource_availability(&self, resource_id: &str) -> Option<f64>;

    /// Total misbehaviour hits reported against the platform.
    async fn platform_anomaly_hits(&self, platform_id: &str) -> Option<u64>;

    /// Number of bartering transactions by the platform since `since`.
    async fn bartering_count(&self, platform_id: &str, since: DateTime<Utc>) -> Option<u64>;
}

/// Source of federation membership history, input to the reputation
/// formula's history sub-score.
#[async_trait]
pub trait FederationHistorySource: Send + Sync {
    /// Membership intervals for the platform; empty when none are known or
    /// the source is unreachable.
    async fn fetch_history(&self, platform_id: &str) -> Vec<FederationHistory>;
}
