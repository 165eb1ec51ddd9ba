//! Aggregation of computed rows into summaries.
//!
//! A summary's day-to-threshold uses the on-hand weighted mean of its member
//! rates. That is an approximation: it is not the same as combining each
//! member's own projection, and it is not meant to be.

use std::collections::{BTreeMap, BTreeSet};

use attrition_core::traits::AttritionModel;
use attrition_core::types::{combat_power_pct, ComputedRow, Count, Projection, RatePct, Summary};

/// Running totals for one summary.
#[derive(Debug, Clone, Default)]
pub struct SummaryBuilder {
    rows: usize,
    on_hand: Count,
    remaining: Count,
    destroyed: Count,
    weighted_rate_sum: f64,
}

impl SummaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one computed row in. Rows with nothing on hand add to the row
    /// count but carry no rate weight.
    pub fn add(&mut self, row: &ComputedRow) {
        let on_hand = row.row.on_hand;
        self.rows += 1;
        self.on_hand = self.on_hand.saturating_add(on_hand);
        self.remaining = self.remaining.saturating_add(row.remaining);
        self.destroyed = self.destroyed.saturating_add(row.destroyed_final);
        self.weighted_rate_sum += row.effective_rate.pct() * on_hand.as_f64();
    }

    /// `Σ(rate_i * on_hand_i) / Σ(on_hand_i)`, or 0 with nothing on hand.
    pub fn weighted_rate(&self) -> RatePct {
        if self.on_hand.is_zero() {
            return RatePct::ZERO;
        }
        RatePct::new(self.weighted_rate_sum / self.on_hand.as_f64())
    }

    pub fn finish(
        &self,
        name: impl Into<String>,
        model: &dyn AttritionModel,
        target_fraction: f64,
    ) -> Summary {
        let weighted_rate = self.weighted_rate();
        let days_to_threshold = if self.on_hand.is_zero() {
            Projection::Unreachable
        } else {
            model.days_to_fraction(weighted_rate, target_fraction)
        };
        Summary {
            name: name.into(),
            rows: self.rows,
            on_hand: self.on_hand,
            remaining: self.remaining,
            destroyed: self.destroyed,
            combat_power_pct: combat_power_pct(self.remaining, self.on_hand),
            weighted_rate,
            days_to_threshold,
        }
    }
}

/// One summary per canonical unit, sorted by unit identifier.
pub fn unit_summaries(
    rows: &[ComputedRow],
    model: &dyn AttritionModel,
    target_fraction: f64,
) -> Vec<Summary> {
    let mut units: BTreeMap<&str, SummaryBuilder> = BTreeMap::new();
    for row in rows {
        units.entry(row.row.unit.as_str()).or_default().add(row);
    }
    units
        .into_iter()
        .map(|(unit, builder)| builder.finish(unit, model, target_fraction))
        .collect()
}

/// The fixed two-entry split: rows whose unit is in `members`, then the rest.
/// Both entries are always present, even when empty.
pub fn group_summaries(
    rows: &[ComputedRow],
    members: &BTreeSet<String>,
    names: (&str, &str),
    model: &dyn AttritionModel,
    target_fraction: f64,
) -> [Summary; 2] {
    let mut inside = SummaryBuilder::new();
    let mut outside = SummaryBuilder::new();
    for row in rows {
        if members.contains(&row.row.unit) {
            inside.add(row);
        } else {
            outside.add(row);
        }
    }
    [
        inside.finish(names.0, model, target_fraction),
        outside.finish(names.1, model, target_fraction),
    ]
}

/// A single summary over every row.
pub fn total_summary(
    rows: &[ComputedRow],
    name: &str,
    model: &dyn AttritionModel,
    target_fraction: f64,
) -> Summary {
    let mut builder = SummaryBuilder::new();
    rows.iter().for_each(|row| builder.add(row));
    builder.finish(name, model, target_fraction)
}
