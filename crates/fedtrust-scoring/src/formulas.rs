//! Pure scoring formulas.
//!
//! External signal counts span several orders of magnitude, so the count
//! signals map through discrete step functions rather than continuous
//! scales; the bands keep the mapping auditable and avoid false precision.
//! Boundary semantics are exact: bartering and confidence bands compare
//! with strict `>`, anomaly and violation bands with strict `<`.

use chrono::{DateTime, Utc};

use fedtrust_core::FederationHistory;

/// Weight of the federation-history sub-score in the platform reputation.
const WEIGHT_HISTORY: f64 = 10.0;
/// Weight of the bartering-activity sub-score.
const WEIGHT_BARTERING: f64 = 5.0;
/// Weight of the anomaly-detection sub-score.
const WEIGHT_ANOMALY: f64 = 1.0;

/// Availability ratio `[0, 1]` scaled to the score range.
pub fn availability_score(ratio: f64) -> f64 {
    ratio * 100.0
}

/// Discount factor applied to a resource's availability score based on the
/// number of SLA violations recorded in the recent window.
pub fn violation_factor(count: u64) -> f64 {
    if count < 5 {
        1.0
    } else if count < 10 {
        0.95
    } else if count < 15 {
        0.8
    } else if count < 25 {
        0.6
    } else if count < 40 {
        0.3
    } else {
        0.1
    }
}

/// Bartering-activity sub-score from the transaction count of the last
/// 12 hours.
pub fn bartering_score(count: u64) -> f64 {
    if count > 100 {
        100.0
    } else if count > 50 {
        95.0
    } else if count > 25 {
        80.0
    } else if count > 12 {
        60.0
    } else if count > 6 {
        30.0
    } else {
        10.0
    }
}

/// Anomaly-detection sub-score from the total misbehaviour hit count.
pub fn anomaly_score(hits: u64) -> f64 {
    if hits < 10 {
        100.0
    } else if hits < 100 {
        95.0
    } else if hits < 1_000 {
        80.0
    } else if hits < 10_000 {
        60.0
    } else if hits < 100_000 {
        30.0
    } else {
        10.0
    }
}

/// Confidence in a platform's reported values, derived from its reputation.
/// A reputation of exactly 90.0 falls into the `<= 90` band.
pub fn confidence_factor(reputation: f64) -> f64 {
    if reputation > 90.0 {
        1.0
    } else if reputation > 70.0 {
        0.95
    } else if reputation > 50.0 {
        0.8
    } else if reputation > 30.0 {
        0.6
    } else if reputation > 10.0 {
        0.3
    } else {
        0.1
    }
}

/// Federation-history sub-score: average membership ratio over all known
/// intervals, scaled to the score range. No intervals means no signal.
pub fn history_score(histories: &[FederationHistory], now: DateTime<Utc>) -> Option<f64> {
    if histories.is_empty() {
        return None;
    }
    let sum: f64 = histories.iter().map(|h| h.membership_ratio(now)).sum();
    Some(sum / histories.len() as f64 * 100.0)
}

/// Weighted average of the reputation sub-scores. Absent sub-scores are
/// excluded from numerator and denominator alike; all absent means the
/// overall reputation is absent.
pub fn weighted_reputation(
    history: Option<f64>,
    bartering: Option<f64>,
    anomaly: Option<f64>,
) -> Option<f64> {
    let mut total = 0.0;
    let mut weights = 0.0;

    if let Some(score) = history {
        total += score * WEIGHT_HISTORY;
        weights += WEIGHT_HISTORY;
    }
    if let Some(score) = bartering {
        total += score * WEIGHT_BARTERING;
        weights += WEIGHT_BARTERING;
    }
    if let Some(score) = anomaly {
        total += score * WEIGHT_ANOMALY;
        weights += WEIGHT_ANOMALY;
    }

    if weights > 0.0 {
        Some(total / weights)
    } else {
        None
    }
}
