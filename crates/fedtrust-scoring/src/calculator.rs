//! Binds the pure formulas to the injected collaborators.

use std::sync::Arc;

use chrono::{Duration, Utc};

use fedtrust_core::score;
use fedtrust_core::EntryKey;
use fedtrust_stats::{FederationHistorySource, StatsLoader};
use fedtrust_store::{StoreError, TrustStore, ViolationLog};

use crate::formulas;

/// How far back SLA violations count against a resource.
const VIOLATION_WINDOW_HOURS: i64 = 24;
/// How far back bartering transactions count towards a platform.
const BARTERING_WINDOW_HOURS: i64 = 12;

/// Computes trust scores from external signals and stored state.
///
/// Collaborators are trait objects injected at construction; the calculator
/// itself holds no mutable state and is safe to share across the scheduled
/// jobs.
pub struct TrustCalculator {
    stats: Arc<dyn StatsLoader>,
    history: Arc<dyn FederationHistorySource>,
    store: Arc<dyn TrustStore>,
    violations: Arc<dyn ViolationLog>,
}

impl TrustCalculator {
    pub fn new(
        stats: Arc<dyn StatsLoader>,
        history: Arc<dyn FederationHistorySource>,
        store: Arc<dyn TrustStore>,
        violations: Arc<dyn ViolationLog>,
    ) -> Self {
        Self {
            stats,
            history,
            store,
            violations,
        }
    }

    /// Resource trust: availability scaled to `[0, 100]`, discounted by the
    /// recent SLA violation factor. Absent availability means absent trust —
    /// no score is invented from missing data.
    pub async fn resource_trust(&self, resource_id: &str) -> Result<Option<f64>, StoreError> {
        let availability = match self.stats.resource_availability(resource_id).await {
            Some(ratio) => ratio,
            None => return Ok(None),
        };

        let since = Utc::now() - Duration::hours(VIOLATION_WINDOW_HOURS);
        let violation_count = self.violations.count_since(resource_id, since).await?;

        let trust = formulas::availability_score(availability)
            * formulas::violation_factor(violation_count);
        Ok(score::round2_opt(score::sanitize(Some(trust))))
    }

    /// Platform reputation: weighted average of the federation-history,
    /// bartering and anomaly sub-scores, skipping absent signals.
    pub async fn platform_reputation(&self, platform_id: &str) -> Option<f64> {
        let histories = self.history.fetch_history(platform_id).await;
        let history = formulas::history_score(&histories, Utc::now());

        let since = Utc::now() - Duration::hours(BARTERING_WINDOW_HOURS);
        let bartering = self
            .stats
            .bartering_count(platform_id, since)
            .await
            .map(formulas::bartering_score);

        let anomaly = self
            .stats
            .platform_anomaly_hits(platform_id)
            .await
            .map(formulas::anomaly_score);

        let reputation = formulas::weighted_reputation(history, bartering, anomaly);
        score::round2_opt(score::sanitize(reputation))
    }

    /// Adaptive resource trust: the resource's trust discounted by the
    /// confidence in its platform's reputation, smoothed against the
    /// previous value (factor 0.5) to dampen reputation swings.
    ///
    /// Requires both underlying scores to exist; otherwise the result is
    /// absent.
    pub async fn adaptive_resource_trust(
        &self,
        current_value: Option<f64>,
        resource_id: &str,
        platform_id: &str,
    ) -> Result<Option<f64>, StoreError> {
        let resource_entry = self.store.find_resource_trust(resource_id).await?;
        let resource_trust = match resource_entry.and_then(|e| e.value) {
            Some(value) => value,
            None => {
                tracing::warn!(resource_id, "shared resource trust does not exist");
                return Ok(None);
            }
        };

        let key = EntryKey::platform_reputation(platform_id);
        let reputation = match self.store.get(&key).await?.and_then(|e| e.value) {
            Some(value) => value,
            None => {
                tracing::warn!(platform_id, "platform reputation does not exist");
                return Ok(None);
            }
        };

        let mut adaptive = resource_trust * formulas::confidence_factor(reputation);
        if let Some(current) = current_value {
            adaptive = (adaptive + current) / 2.0;
        }

        Ok(score::round2_opt(score::sanitize(Some(adaptive))))
    }
}
