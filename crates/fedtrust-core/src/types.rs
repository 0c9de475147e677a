use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::score;

/// The three kinds of trust scores maintained by the trust manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrustEntryType {
    /// Reliability of a single shared resource, derived from availability
    /// telemetry and SLA violation history.
    ResourceTrust,
    /// Overall trustworthiness of a partner platform, derived from
    /// federation-membership history, bartering behaviour and anomaly reports.
    PlatformReputation,
    /// Resource trust discounted by the hosting platform's reputation,
    /// smoothed over time.
    AdaptiveResourceTrust,
}

impl TrustEntryType {
    /// Stable identifier used in keys and topic names.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustEntryType::ResourceTrust => "resource_trust",
            TrustEntryType::PlatformReputation => "platform_reputation",
            TrustEntryType::AdaptiveResourceTrust => "adaptive_resource_trust",
        }
    }
}

impl std::fmt::Display for TrustEntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a trust entry: `(type, platform_id, resource_id)`.
///
/// Two entries may never share a key; the store uses the encoded form as its
/// primary key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryKey {
    pub entry_type: TrustEntryType,
    pub platform_id: Option<String>,
    pub resource_id: Option<String>,
}

impl EntryKey {
    pub fn resource_trust(platform_id: Option<&str>, resource_id: &str) -> Self {
        Self {
            entry_type: TrustEntryType::ResourceTrust,
            platform_id: platform_id.map(str::to_string),
            resource_id: Some(resource_id.to_string()),
        }
    }

    pub fn platform_reputation(platform_id: &str) -> Self {
        Self {
            entry_type: TrustEntryType::PlatformReputation,
            platform_id: Some(platform_id.to_string()),
            resource_id: None,
        }
    }

    pub fn adaptive_resource_trust(platform_id: Option<&str>, resource_id: &str) -> Self {
        Self {
            entry_type: TrustEntryType::AdaptiveResourceTrust,
            platform_id: platform_id.map(str::to_string),
            resource_id: Some(resource_id.to_string()),
        }
    }

    /// Deterministic encoding, usable as a byte key in the store.
    ///
    /// Absent components encode as the empty string, keeping the layout
    /// fixed so keys remain unique across all three entry shapes.
    pub fn encode(&self) -> String {
        format!(
            "{}/{}/{}",
            self.entry_type.as_str(),
            self.platform_id.as_deref().unwrap_or(""),
            self.resource_id.as_deref().unwrap_or("")
        )
    }
}

impl std::fmt::Display for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.encode())
    }
}

/// A trust score snapshot for one resource or platform.
///
/// Entries are immutable values: each recomputation produces a new snapshot
/// via [`TrustEntry::with_value`], which simplifies change detection to a
/// comparison of two plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrustEntry {
    #[serde(rename = "type")]
    pub entry_type: TrustEntryType,
    pub platform_id: Option<String>,
    pub resource_id: Option<String>,
    /// Current score in `[0, 100]`, or `None` when not yet computed.
    pub value: Option<f64>,
    /// Timestamp of the last successful computation.
    pub last_update: DateTime<Utc>,
}

impl TrustEntry {
    /// Create a placeholder entry with no computed value yet.
    pub fn placeholder(key: EntryKey) -> Self {
        Self {
            entry_type: key.entry_type,
            platform_id: key.platform_id,
            resource_id: key.resource_id,
            value: None,
            last_update: Utc::now(),
        }
    }

    /// Produce a new snapshot carrying the given (sanitized) value and a
    /// fresh `last_update` timestamp.
    pub fn with_value(&self, value: Option<f64>) -> Self {
        Self {
            value: score::sanitize(value),
            last_update: Utc::now(),
            ..self.clone()
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey {
            entry_type: self.entry_type,
            platform_id: self.platform_id.clone(),
            resource_id: self.resource_id.clone(),
        }
    }
}
