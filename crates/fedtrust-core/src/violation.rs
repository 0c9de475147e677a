use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded SLA violation for one resource.
///
/// Violations feed the resource trust formula's violation factor: the more
/// violations a resource accumulated recently, the harder its availability
/// score is discounted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub resource_id: String,
    /// Violated SLA constraint, as reported by the monitoring side.
    pub constraint: String,
    pub date: DateTime<Utc>,
}

impl Violation {
    pub fn new(resource_id: &str, constraint: &str) -> Self {
        Self {
            resource_id: resource_id.to_string(),
            constraint: constraint.to_string(),
            date: Utc::now(),
        }
    }
}
