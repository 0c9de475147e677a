//! Inbound event handling: entry lifecycle transitions.
//!
//! The ingestor reacts to resource and federation lifecycle events by
//! creating placeholder entries (which the scheduler later populates),
//! applying pushed foreign trust values, and deleting entries whose
//! subject disappeared. Empty event payloads are no-ops, not errors.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::mpsc;

use fedtrust_core::events::{Federation, ForeignResource, IngestEvent, SharedResource};
use fedtrust_core::score;
use fedtrust_core::{EntryKey, TrustEntry, Violation};
use fedtrust_store::{StoreError, TrustStore, ViolationLog};

/// Applies inbound lifecycle events to the trust entry store.
pub struct EventIngestor {
    own_platform_id: String,
    store: Arc<dyn TrustStore>,
    violations: Arc<dyn ViolationLog>,
}

impl EventIngestor {
    pub fn new(
        own_platform_id: String,
        store: Arc<dyn TrustStore>,
        violations: Arc<dyn ViolationLog>,
    ) -> Self {
        Self {
            own_platform_id,
            store,
            violations,
        }
    }

    /// Consume events until the channel closes. Store failures are logged
    /// and never stop the loop.
    pub async fn run(&self, mut rx: mpsc::Receiver<IngestEvent>) {
        while let Some(event) = rx.recv().await {
            if let Err(e) = self.handle(event).await {
                tracing::error!(error = %e, "event handling failed");
            }
        }
        tracing::info!("ingest channel closed, event loop exiting");
    }

    /// Dispatch one event to its handler.
    pub async fn handle(&self, event: IngestEvent) -> Result<(), StoreError> {
        match event {
            IngestEvent::ResourcesShared(resources) => self.resources_shared(&resources).await,
            IngestEvent::ResourcesUnshared(ids) => self.resources_unshared(&ids).await,
            IngestEvent::ForeignResourcesShared(resources) => {
                self.foreign_resources_shared(&resources).await
            }
            IngestEvent::ForeignResourcesUnshared(ids) => {
                self.foreign_resources_unshared(&ids).await
            }
            IngestEvent::FederationUpdated(federation) => {
                self.federation_updated(&federation).await
            }
            IngestEvent::SlaViolation {
                resource_id,
                constraint,
            } => {
                self.violations
                    .record(&Violation::new(&resource_id, &constraint))
                    .await
            }
        }
    }

    /// Own resources shared: create a resource trust placeholder per
    /// resource unless one already exists. The scheduler fills the value in.
    async fn resources_shared(&self, resources: &[SharedResource]) -> Result<(), StoreError> {
        for resource in resources {
            let key = EntryKey::resource_trust(Some(&self.own_platform_id), &resource.resource_id);
            if !self.store.exists(&key).await? {
                self.store.save(&TrustEntry::placeholder(key)).await?;
                tracing::debug!(
                    resource_id = %resource.resource_id,
                    platform_id = %self.own_platform_id,
                    "added own resource"
                );
            }
        }
        Ok(())
    }

    /// Own resources unshared: drop their trust entries. Absent keys are a
    /// no-op.
    async fn resources_unshared(&self, resource_ids: &[String]) -> Result<(), StoreError> {
        for resource_id in resource_ids {
            let key = EntryKey::resource_trust(Some(&self.own_platform_id), resource_id);
            self.store.delete(&key).await?;
            tracing::debug!(%resource_id, "deleted own resource");
        }
        Ok(())
    }

    /// Foreign resources shared into a federation: the trust value travels
    /// with the message, so it is sanitized and written directly instead of
    /// going through the compute path.
    async fn foreign_resources_shared(
        &self,
        resources: &[ForeignResource],
    ) -> Result<(), StoreError> {
        for resource in resources {
            let key =
                EntryKey::resource_trust(Some(&resource.platform_id), &resource.resource_id);
            let entry =
                TrustEntry::placeholder(key).with_value(score::sanitize(resource.trust));
            self.store.save(&entry).await?;
            tracing::debug!(
                resource_id = %resource.resource_id,
                platform_id = %resource.platform_id,
                value = ?entry.value,
                "updated foreign resource trust"
            );
        }
        Ok(())
    }

    /// Foreign resources unshared: find the matching entry by resource id
    /// and delete it.
    async fn foreign_resources_unshared(
        &self,
        resource_ids: &HashSet<String>,
    ) -> Result<(), StoreError> {
        for resource_id in resource_ids {
            if let Some(entry) = self.store.find_resource_trust(resource_id).await? {
                self.store.delete(&entry.key()).await?;
                tracing::debug!(%resource_id, "removed foreign resource trust");
            }
        }
        Ok(())
    }

    /// Federation created or membership changed: ensure a reputation
    /// placeholder exists for every member platform.
    async fn federation_updated(&self, federation: &Federation) -> Result<(), StoreError> {
        for member in &federation.members {
            let key = EntryKey::platform_reputation(member);
            if !self.store.exists(&key).await? {
                self.store.save(&TrustEntry::placeholder(key)).await?;
                tracing::debug!(
                    platform_id = %member,
                    federation_id = %federation.federation_id,
                    "added federated platform"
                );
            }
        }
        Ok(())
    }
}
