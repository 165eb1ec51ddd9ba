//! Per-row computation: manual totals, model estimate, reconciliation, and
//! projection.

use attrition_core::traits::AttritionModel;
use attrition_core::types::{
    combat_power_pct, ComputedRow, Count, Day, Projection, RateSource, RatePct, Reconciliation,
    Row,
};

/// Effective rate for a row: the reported rate when it is present and
/// positive, otherwise the rate inferred from manual losses through `day`.
pub fn effective_rate(model: &dyn AttritionModel, row: &Row, day: Day) -> (RatePct, RateSource) {
    match row.rate {
        Some(rate) if !rate.is_zero() => (rate, RateSource::Reported),
        _ => (
            model.infer_rate(row.on_hand, &row.destroyed_by_day, day),
            RateSource::Inferred,
        ),
    }
}

/// Compute every derived figure for one row.
///
/// `modeling` toggles the model estimate; with it off the manual figure is
/// final under either policy. The result always satisfies
/// `destroyed_final + remaining == on_hand`.
pub fn compute_row(
    model: &dyn AttritionModel,
    row: Row,
    day: Day,
    modeling: bool,
    policy: Reconciliation,
    target_fraction: f64,
) -> ComputedRow {
    let on_hand = row.on_hand;
    let destroyed_manual = row.destroyed_by_day.through(day).at_most(on_hand);
    let destroyed_manual_total = row.destroyed_by_day.total().at_most(on_hand);

    let (rate, rate_source) = effective_rate(model, &row, day);

    let modeled = modeling.then(|| model.modeled_destroyed(on_hand, rate, day));
    let destroyed_final = policy.reconcile(destroyed_manual, modeled).at_most(on_hand);
    let remaining = on_hand.saturating_sub(destroyed_final);

    let days_to_threshold = if on_hand.is_zero() {
        Projection::Unreachable
    } else {
        model.days_to_fraction(rate, target_fraction)
    };

    ComputedRow {
        row,
        day,
        effective_rate: rate,
        rate_source,
        destroyed_model: modeled.unwrap_or(Count::ZERO),
        destroyed_manual,
        destroyed_manual_total,
        destroyed_final,
        remaining,
        combat_power_pct: combat_power_pct(remaining, on_hand),
        days_to_threshold,
    }
}
