//! Threshold projection: the first whole day on which the remaining fraction
//! reaches a target.
//!
//! Solves `target = (1 - p)^d` for `d = ln(target) / ln(1 - p)` and rounds up.

use attrition_core::types::{Projection, RatePct};

/// Days until the remaining fraction is at or below `target_fraction`.
///
/// Edge cases, evaluated in order:
/// 1. `target <= 0`: `Day(0)`, already satisfied
/// 2. `target >= 1`: `Unreachable`
/// 3. `p <= 0`: `Unreachable`, nothing decays
/// 4. `p >= 1`: `Day(0)`, immediate total loss
/// 5. otherwise `ceil(d)`, or `Unreachable` if that is not a finite
///    non-negative number (NaN target, for instance) or lies past the last
///    representable day, `u32::MAX`
///
/// # Examples
///
/// ```
/// use attrition_core::types::{Projection, RatePct};
/// use attrition_decay::days_to_fraction;
/// assert_eq!(days_to_fraction(RatePct::new(50.0), 0.3), Projection::Day(2));
/// assert_eq!(days_to_fraction(RatePct::ZERO, 0.5), Projection::Unreachable);
/// assert_eq!(days_to_fraction(RatePct::new(10.0), 0.0), Projection::Day(0));
/// ```
pub fn days_to_fraction(rate: RatePct, target_fraction: f64) -> Projection {
    if target_fraction <= 0.0 {
        return Projection::Day(0);
    }
    if target_fraction >= 1.0 {
        return Projection::Unreachable;
    }
    let p = rate.fraction();
    if p <= 0.0 {
        return Projection::Unreachable;
    }
    if p >= 1.0 {
        return Projection::Day(0);
    }

    let days = (target_fraction.ln() / (1.0 - p).ln()).ceil();
    if !days.is_finite() || days < 0.0 || days > f64::from(u32::MAX) {
        return Projection::Unreachable;
    }
    Projection::Day(days as u32)
}
