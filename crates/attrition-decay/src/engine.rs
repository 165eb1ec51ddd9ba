//! Compound decay model implementing the [`AttritionModel`] trait.
//!
//! Wires the forward projection, rate inference, and threshold projection
//! functions behind the trait used by the rollup engine.

use attrition_core::traits::AttritionModel;
use attrition_core::types::{Count, DailyLosses, Day, Projection, RatePct};

use crate::{inference, survival, threshold};

/// The production attrition model: constant daily rate, compound survival.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundDecay;

impl CompoundDecay {
    /// Create a new CompoundDecay.
    pub fn new() -> Self {
        Self
    }

    /// Remaining count for each day `0..=days`.
    pub fn trajectory(&self, start: f64, rate: RatePct, days: u32) -> Vec<f64> {
        survival::trajectory(start, rate, days)
    }
}

impl AttritionModel for CompoundDecay {
    fn remaining(&self, start: f64, rate: RatePct, days: u32) -> f64 {
        survival::remaining(start, rate, days)
    }

    fn infer_rate(&self, on_hand: Count, losses: &DailyLosses, day: Day) -> RatePct {
        inference::infer_rate(on_hand, losses, day)
    }

    fn days_to_fraction(&self, rate: RatePct, target_fraction: f64) -> Projection {
        threshold::days_to_fraction(rate, target_fraction)
    }
}
