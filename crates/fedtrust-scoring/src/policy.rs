//! Change-detection policy for recomputed scores.

/// Whether a recomputed value differs from the stored one enough to
/// announce.
///
/// This is a strict-equality policy, not a threshold policy: downstream
/// consumers (adaptive trust among them) need every change, however small,
/// to stay convergent. A value appearing, disappearing or changing
/// numerically all publish; only "still equal" and "still absent" stay
/// quiet.
pub fn should_publish(old_value: Option<f64>, new_value: Option<f64>) -> bool {
    match old_value {
        Some(old) => new_value != Some(old),
        None => new_value.is_some(),
    }
}
