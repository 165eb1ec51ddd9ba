//! Forward projection under compound daily decay.

use attrition_core::types::RatePct;

/// Remaining count after `days` days: `start * (1 - p)^days`.
///
/// Edge cases, in order:
/// - `start <= 0` (or NaN): 0
/// - `days == 0`: `start`
/// - `p <= 0`: `start`
/// - `p >= 1`: 0
///
/// # Examples
///
/// ```
/// use attrition_core::types::RatePct;
/// use attrition_decay::remaining;
/// assert_eq!(remaining(100.0, RatePct::new(50.0), 2), 25.0);
/// assert_eq!(remaining(80.0, RatePct::FULL, 1), 0.0);
/// assert_eq!(remaining(80.0, RatePct::ZERO, 5), 80.0);
/// ```
pub fn remaining(start: f64, rate: RatePct, days: u32) -> f64 {
    if start.is_nan() || start <= 0.0 {
        return 0.0;
    }
    if days == 0 {
        return start;
    }
    let p = rate.fraction();
    if p <= 0.0 {
        return start;
    }
    if p >= 1.0 {
        return 0.0;
    }
    start * (1.0 - p).powf(days as f64)
}

/// Remaining count for every day `0..=days`. Element 0 is `start` itself.
pub fn trajectory(start: f64, rate: RatePct, days: u32) -> Vec<f64> {
    (0..=days).map(|d| remaining(start, rate, d)).collect()
}
