//! Deserialized domain events crossing the trust manager's boundaries.
//!
//! Inbound events drive entry lifecycle transitions; the outbound
//! [`TrustUpdate`] is what the publish channel carries to consumers.
//! Wire encoding is the transport's concern — by the time an event reaches
//! the ingestor, optional fields are already `Option`s, so handlers need a
//! single absent-vs-present check instead of nested null guards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::TrustEntry;

/// A resource shared by the own platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedResource {
    pub resource_id: String,
}

/// A resource shared into a federation by a partner platform, carrying the
/// trust value embedded in the federation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForeignResource {
    pub platform_id: String,
    pub resource_id: String,
    /// Trust value as claimed by the sharing platform; sanitized before use.
    pub trust: Option<f64>,
}

/// A federation lifecycle announcement with its current member platforms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Federation {
    pub federation_id: String,
    pub members: Vec<String>,
}

/// Inbound events consumed by the event ingestor.
#[derive(Debug, Clone)]
pub enum IngestEvent {
    /// Own resources were shared or re-registered.
    ResourcesShared(Vec<SharedResource>),
    /// Own resources were unshared; carries resource ids.
    ResourcesUnshared(Vec<String>),
    /// Foreign resources were shared or updated by partner platforms.
    ForeignResourcesShared(Vec<ForeignResource>),
    /// Foreign resources were unshared; carries resource ids.
    ForeignResourcesUnshared(HashSet<String>),
    /// A federation was created or its membership changed.
    FederationUpdated(Federation),
    /// An SLA violation was reported for one of the own resources.
    SlaViolation { resource_id: String, constraint: String },
}

/// Outbound notification published after a materially changed recomputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrustUpdate {
    pub entry: TrustEntry,
}

impl TrustUpdate {
    pub fn new(entry: TrustEntry) -> Self {
        Self { entry }
    }

    /// Topic the update is published on, one per entry type.
    pub fn topic(&self) -> &'static str {
        self.entry.entry_type.as_str()
    }
}
