//! Core trait for attrition models.
//!
//! The rollup engine depends only on [`AttritionModel`]; the compound decay
//! implementation lives in attrition-decay.

use crate::types::{Count, DailyLosses, Day, Projection, RatePct};

/// Forward projection, rate inference, and threshold crossing for a constant
/// daily attrition rate.
///
/// Every method is total: degenerate inputs map to documented values rather
/// than errors.
pub trait AttritionModel: Send + Sync {
    /// Expected remaining count after `days` days starting from `start`.
    ///
    /// Returns a real number in `[0, start]` (0 when `start <= 0`). Callers
    /// round as needed.
    fn remaining(&self, start: f64, rate: RatePct, days: u32) -> f64;

    /// The constant daily rate that reproduces the manual losses observed
    /// through `day`.
    fn infer_rate(&self, on_hand: Count, losses: &DailyLosses, day: Day) -> RatePct;

    /// First whole day on which the remaining fraction is at or below
    /// `target_fraction`.
    fn days_to_fraction(&self, rate: RatePct, target_fraction: f64) -> Projection;

    /// Model-estimated destroyed count through `day`, rounded to the nearest
    /// item and clamped to `[0, on_hand]`.
    ///
    /// Default implementation: `round(on_hand - remaining(on_hand, rate, day))`.
    fn modeled_destroyed(&self, on_hand: Count, rate: RatePct, day: Day) -> Count {
        let start = on_hand.as_f64();
        let remaining = self.remaining(start, rate, day.get());
        Count::from_f64((start - remaining).round()).at_most(on_hand)
    }
}
