use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One platform's membership interval in one federation.
///
/// Read-only input to the platform reputation formula; never persisted by
/// the trust manager itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationHistory {
    pub federation_id: String,
    pub federation_created: DateTime<Utc>,
    /// Absent while the federation still exists.
    pub federation_removed: Option<DateTime<Utc>>,
    pub platform_joined: DateTime<Utc>,
    /// Absent while the platform is still a member.
    pub platform_left: Option<DateTime<Utc>>,
}

impl FederationHistory {
    /// Ratio of the platform's membership duration to the federation's
    /// lifetime, using `now` for intervals that are still open.
    pub fn membership_ratio(&self, now: DateTime<Utc>) -> f64 {
        let federation_end = self.federation_removed.unwrap_or(now);
        let platform_end = self.platform_left.unwrap_or(now);

        let federation_period = (federation_end - self.federation_created).num_milliseconds();
        let platform_period = (platform_end - self.platform_joined).num_milliseconds();

        platform_period as f64 / federation_period as f64
    }
}
