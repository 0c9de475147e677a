//! Publish channel for trust update notifications.
//!
//! Publishing is fire and forget: the core never waits for or depends on
//! consumer acknowledgment. The in-process implementation fans updates out
//! over a `tokio::sync::broadcast` channel, one logical topic per entry
//! type; a broker-backed implementation would slot in behind the same
//! trait.

use async_trait::async_trait;
use tokio::sync::broadcast;

use fedtrust_core::events::TrustUpdate;

/// Outbound notification channel for changed trust entries.
#[async_trait]
pub trait TrustPublisher: Send + Sync {
    /// Announce a changed entry. Must not fail into the caller; delivery
    /// problems are the channel's concern.
    async fn publish(&self, update: TrustUpdate);
}

/// Broadcast-channel publisher for in-process consumers.
pub struct BroadcastBus {
    tx: broadcast::Sender<TrustUpdate>,
}

impl BroadcastBus {
    /// Create a bus retaining up to `capacity` undelivered updates per
    /// subscriber before older ones are dropped.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all trust updates. Consumers filter by
    /// [`TrustUpdate::topic`] as needed.
    pub fn subscribe(&self) -> broadcast::Receiver<TrustUpdate> {
        self.tx.subscribe()
    }
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl TrustPublisher for BroadcastBus {
    async fn publish(&self, update: TrustUpdate) {
        tracing::debug!(
            topic = update.topic(),
            key = %update.entry.key(),
            value = ?update.entry.value,
            "publishing trust update"
        );
        // A send error only means there are no subscribers right now.
        let _ = self.tx.send(update);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fedtrust_core::{EntryKey, TrustEntry};

    #[tokio::test]
    async fn test_subscriber_receives_update_on_matching_topic() {
        let bus = BroadcastBus::new(8);
        let mut rx = bus.subscribe();

        let entry = TrustEntry::placeholder(EntryKey::platform_reputation("p-1"))
            .with_value(Some(42.0));
        bus.publish(TrustUpdate::new(entry)).await;

        let update = rx.recv().await.unwrap();
        assert_eq!(update.topic(), "platform_reputation");
        assert_eq!(update.entry.value, Some(42.0));
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_noop() {
        let bus = BroadcastBus::new(8);
        let entry = TrustEntry::placeholder(EntryKey::resource_trust(Some("p"), "r"));
        // Must not panic or error.
        bus.publish(TrustUpdate::new(entry)).await;
    }
}
