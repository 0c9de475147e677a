//! Scheduled recomputation of all stored trust entries.
//!
//! One periodic job per entry type, each driving the same batch function:
//! select stale entries, recompute each through the matching formula,
//! persist, and publish when the change policy says so. The batch function
//! carries no timer dependency so tests can drive it directly.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use fedtrust_bus::TrustPublisher;
use fedtrust_core::events::TrustUpdate;
use fedtrust_core::{TrustEntry, TrustEntryType};
use fedtrust_scoring::{should_publish, TrustCalculator};
use fedtrust_store::{StoreError, TrustStore};

/// Counters describing one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Entries selected as stale.
    pub selected: usize,
    /// Entries whose new value warranted a notification.
    pub published: usize,
    /// Entries whose processing failed; the rest of the batch still ran.
    pub failed: usize,
}

/// Drives periodic recomputation for every stored entry of each type.
pub struct UpdateScheduler {
    calculator: Arc<TrustCalculator>,
    store: Arc<dyn TrustStore>,
    publisher: Arc<dyn TrustPublisher>,
    staleness_window_minutes: i64,
}

impl UpdateScheduler {
    pub fn new(
        calculator: Arc<TrustCalculator>,
        store: Arc<dyn TrustStore>,
        publisher: Arc<dyn TrustPublisher>,
        staleness_window_minutes: i64,
    ) -> Self {
        Self {
            calculator,
            store,
            publisher,
            staleness_window_minutes,
        }
    }

    /// Run one recomputation batch for the given entry type.
    ///
    /// Entries are processed independently: a failure on one is logged and
    /// counted, never aborting the remainder of the batch.
    pub async fn run_batch(&self, entry_type: TrustEntryType) -> BatchOutcome {
        let entries = match self
            .store
            .find_stale(self.staleness_window_minutes, entry_type)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(%entry_type, error = %e, "stale entry selection failed");
                return BatchOutcome::default();
            }
        };

        tracing::debug!(%entry_type, count = entries.len(), "update triggered");

        let mut outcome = BatchOutcome {
            selected: entries.len(),
            ..Default::default()
        };

        for entry in &entries {
            match self.process_entry(entry).await {
                Ok(published) => {
                    if published {
                        outcome.published += 1;
                    }
                }
                Err(e) => {
                    tracing::error!(key = %entry.key(), error = %e, "entry update failed");
                    outcome.failed += 1;
                }
            }
        }

        outcome
    }

    /// Recompute one entry: capture the old value, compute the new one,
    /// persist unconditionally, publish when changed. Returns whether a
    /// notification went out.
    async fn process_entry(&self, entry: &TrustEntry) -> Result<bool, StoreError> {
        let old_value = entry.value;
        let new_value = self.compute(entry).await?;

        let updated = entry.with_value(new_value);
        self.store.save(&updated).await?;

        if should_publish(old_value, updated.value) {
            tracing::debug!(
                key = %updated.key(),
                old = ?old_value,
                new = ?updated.value,
                "trust value updated"
            );
            self.publisher
                .publish(TrustUpdate::new(updated.clone()))
                .await;
            return Ok(true);
        }

        Ok(false)
    }

    async fn compute(&self, entry: &TrustEntry) -> Result<Option<f64>, StoreError> {
        match entry.entry_type {
            TrustEntryType::ResourceTrust => match entry.resource_id.as_deref() {
                Some(resource_id) => self.calculator.resource_trust(resource_id).await,
                None => {
                    tracing::warn!(key = %entry.key(), "resource trust entry without resource id");
                    Ok(None)
                }
            },
            TrustEntryType::PlatformReputation => match entry.platform_id.as_deref() {
                Some(platform_id) => Ok(self.calculator.platform_reputation(platform_id).await),
                None => {
                    tracing::warn!(key = %entry.key(), "reputation entry without platform id");
                    Ok(None)
                }
            },
            TrustEntryType::AdaptiveResourceTrust => {
                match (entry.resource_id.as_deref(), entry.platform_id.as_deref()) {
                    (Some(resource_id), Some(platform_id)) => {
                        self.calculator
                            .adaptive_resource_trust(entry.value, resource_id, platform_id)
                            .await
                    }
                    _ => {
                        tracing::warn!(key = %entry.key(), "adaptive entry missing identity");
                        Ok(None)
                    }
                }
            }
        }
    }

    /// Spawn the periodic job for one entry type.
    ///
    /// A single task per type runs batches back to back off an interval
    /// with skipped missed ticks, so overlapping runs of the same job
    /// cannot happen while jobs of different types stay independent.
    pub fn spawn(self: Arc<Self>, entry_type: TrustEntryType, period: Duration) -> JoinHandle<()> {
        let scheduler = self;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick fires immediately; skip it so freshly created
            // placeholders get a full staleness window first.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let outcome = scheduler.run_batch(entry_type).await;
                tracing::info!(
                    %entry_type,
                    selected = outcome.selected,
                    published = outcome.published,
                    failed = outcome.failed,
                    "scheduled batch finished"
                );
            }
        })
    }
}
