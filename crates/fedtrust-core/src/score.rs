//! Score sanitation and rounding.
//!
//! Every value persisted or published by the trust manager passes through
//! [`sanitize`]; formula results additionally pass through [`round2`] as the
//! final step, after all arithmetic.

/// Upper bound of the score range.
pub const MAX_SCORE: f64 = 100.0;

/// Clamp a score into `[0, 100]`; NaN becomes absent.
pub fn sanitize(value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v.is_nan() => None,
        Some(v) => Some(v.clamp(0.0, MAX_SCORE)),
        None => None,
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round an optional score, preserving absence.
pub fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}
