//! Rate inference: the inverse of [`crate::survival::remaining`].
//!
//! Given an observed cumulative loss through day `d`, solve
//! `remaining_frac = (1 - p)^d` for `p`.

use attrition_core::types::{Count, DailyLosses, Day, RatePct};

/// Infer the daily rate from manual losses through `day`.
///
/// # Examples
///
/// ```
/// use attrition_core::types::{Count, DailyLosses, Day};
/// use attrition_decay::infer_rate;
/// let losses = DailyLosses::new([1, 0, 0, 0, 0].map(Count::new));
/// let rate = infer_rate(Count::new(44), &losses, Day::new(1));
/// assert!((rate.pct() - 100.0 / 44.0).abs() < 1e-9);
/// ```
pub fn infer_rate(on_hand: Count, losses: &DailyLosses, day: Day) -> RatePct {
    infer_rate_from_cumulative(on_hand, losses.through(day), day)
}

/// Infer the daily rate from a cumulative destroyed count through `day`.
///
/// - `on_hand == 0`: 0%
/// - everything destroyed: 100%
/// - nothing destroyed: 0%
pub fn infer_rate_from_cumulative(on_hand: Count, destroyed: Count, day: Day) -> RatePct {
    if on_hand.is_zero() {
        return RatePct::ZERO;
    }
    let surviving = on_hand.saturating_sub(destroyed);
    let remaining_frac = surviving.as_f64() / on_hand.as_f64();
    if remaining_frac <= 0.0 {
        return RatePct::FULL;
    }
    if remaining_frac >= 1.0 {
        return RatePct::ZERO;
    }
    let p = 1.0 - remaining_frac.powf(1.0 / day.get() as f64);
    RatePct::from_fraction(p)
}
