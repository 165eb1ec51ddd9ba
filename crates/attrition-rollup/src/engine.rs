//! Rollup engine: the full pipeline from rows to report.
//!
//! Wires normalization, the attrition model, per-row computation, and the
//! unit/group/total rollups. The engine holds only immutable configuration,
//! so one instance can serve any number of independent computations.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use attrition_core::config::EngineConfig;
use attrition_core::constants::TOTALS_NAME;
use attrition_core::error::ConfigError;
use attrition_core::normalize::{canonical_unit, normalize_row};
use attrition_core::traits::AttritionModel;
use attrition_core::types::{ComputedRow, Day, RawRow, Reconciliation, Row};
use attrition_decay::CompoundDecay;

use crate::report::AttritionReport;
use crate::rollup::{group_summaries, total_summary, unit_summaries};
use crate::row::compute_row;

/// Per-call switches: which day, whether to model, and how to reconcile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputeOptions {
    pub day: Day,
    pub modeling: bool,
    pub policy: Reconciliation,
}

impl Default for ComputeOptions {
    fn default() -> Self {
        Self {
            day: Day::FIRST,
            modeling: true,
            policy: Reconciliation::ManualWins,
        }
    }
}

impl ComputeOptions {
    /// Options for `day` (clamped into the window) with the defaults otherwise.
    pub fn for_day(day: i64) -> Self {
        Self {
            day: Day::new(day),
            ..Self::default()
        }
    }

    pub fn with_modeling(mut self, modeling: bool) -> Self {
        self.modeling = modeling;
        self
    }

    pub fn with_policy(mut self, policy: Reconciliation) -> Self {
        self.policy = policy;
        self
    }
}

/// The production rollup engine.
pub struct RollupEngine {
    model: Arc<dyn AttritionModel>,
    config: EngineConfig,
    partition_members: BTreeSet<String>,
}

impl fmt::Debug for RollupEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollupEngine")
            .field("config", &self.config)
            .field("partition_members", &self.partition_members)
            .finish_non_exhaustive()
    }
}

impl RollupEngine {
    /// Create an engine over any attrition model.
    ///
    /// Fails only if `config` does not validate.
    pub fn new(model: Arc<dyn AttritionModel>, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let partition_members = config.partition.canonical_members(&config.aliases);
        debug!(
            aliases = config.aliases.len(),
            partition = %config.partition.name,
            members = partition_members.len(),
            target_fraction = config.target_fraction,
            "rollup engine configured"
        );
        Ok(Self {
            model,
            config,
            partition_members,
        })
    }

    /// Engine over the compound decay model.
    pub fn compound(config: EngineConfig) -> Result<Self, ConfigError> {
        Self::new(Arc::new(CompoundDecay::new()), config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &dyn AttritionModel {
        self.model.as_ref()
    }

    /// Normalize raw rows with this engine's alias table.
    pub fn normalize(&self, raw: &[RawRow]) -> Vec<Row> {
        raw.iter()
            .map(|r| normalize_row(r, &self.config.aliases))
            .collect()
    }

    /// Normalize and compute in one step.
    pub fn compute_raw(&self, raw: &[RawRow], options: ComputeOptions) -> AttritionReport {
        self.compute(self.normalize(raw), options)
    }

    /// Compute every row and every rollup for one day and policy.
    ///
    /// Unit identifiers are canonicalized again here, so rows built by hand
    /// group the same way as normalized ones.
    pub fn compute(&self, rows: Vec<Row>, options: ComputeOptions) -> AttritionReport {
        let ComputeOptions {
            day,
            modeling,
            policy,
        } = options;
        let target = self.config.target_fraction;
        let model = self.model.as_ref();

        debug!(
            rows = rows.len(),
            day = day.get(),
            modeling,
            policy = %policy,
            "computing attrition report"
        );

        let computed: Vec<ComputedRow> = rows
            .into_iter()
            .map(|mut row| {
                row.unit = canonical_unit(&row.unit, &self.config.aliases);
                let c = compute_row(model, row, day, modeling, policy, target);
                trace!(
                    unit = %c.row.unit,
                    category = %c.row.category,
                    on_hand = c.row.on_hand.get(),
                    destroyed = c.destroyed_final.get(),
                    rate = c.effective_rate.pct(),
                    "row computed"
                );
                c
            })
            .collect();

        let units = unit_summaries(&computed, model, target);
        let partition = &self.config.partition;
        let groups = group_summaries(
            &computed,
            &self.partition_members,
            (partition.name.as_str(), partition.others_name.as_str()),
            model,
            target,
        );
        let totals = total_summary(&computed, TOTALS_NAME, model, target);

        debug!(
            units = units.len(),
            on_hand = totals.on_hand.get(),
            remaining = totals.remaining.get(),
            "attrition report ready"
        );

        AttritionReport {
            day,
            modeling,
            policy,
            target_fraction: target,
            rows: computed,
            units,
            groups,
            totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attrition_core::config::{AliasTable, GroupPartition};
    use attrition_core::types::{Count, DailyLosses, Projection, RatePct};
    use serde_json::json;

    fn config() -> EngineConfig {
        EngineConfig {
            target_fraction: 0.5,
            aliases: AliasTable::new()
                .with_aliases("1-2 CAV", ["1/2 CAV", "1-2CAV"])
                .unwrap(),
            partition: GroupPartition {
                name: "TF IRON".into(),
                members: vec!["1/2 cav".into()],
                others_name: "REST".into(),
            },
        }
    }

    fn engine() -> RollupEngine {
        RollupEngine::compound(config()).unwrap()
    }

    fn raw(value: serde_json::Value) -> Vec<RawRow> {
        serde_json::from_value(value).unwrap()
    }

    // --- construction ---

    #[test]
    fn invalid_config_rejected() {
        let cfg = EngineConfig {
            target_fraction: f64::INFINITY,
            ..config()
        };
        assert!(RollupEngine::compound(cfg).is_err());
    }

    #[test]
    fn partition_members_canonicalized() {
        let e = engine();
        assert!(e.partition_members.contains("1-2 CAV"));
    }

    #[test]
    fn options_builders() {
        let o = ComputeOptions::for_day(9)
            .with_modeling(false)
            .with_policy(Reconciliation::ModelWins);
        assert_eq!(o.day, Day::LAST);
        assert!(!o.modeling);
        assert_eq!(o.policy, Reconciliation::ModelWins);
    }

    #[test]
    fn options_deserialize_with_fractional_day() {
        let o: ComputeOptions = serde_json::from_value(json!({
            "day": 2.5,
            "modeling": false,
            "policy": "model-wins"
        }))
        .unwrap();
        assert_eq!(o.day, Day::new(2));
        assert!(!o.modeling);
        assert_eq!(o.policy, Reconciliation::ModelWins);

        let late: ComputeOptions =
            serde_json::from_value(json!({"day": 12, "modeling": true, "policy": "manual-wins"}))
                .unwrap();
        assert_eq!(late.day, Day::LAST);
    }

    // --- compute ---

    #[test]
    fn rows_keep_input_order() {
        let rows = raw(json!([
            {"unit": "C", "on_hand": 1},
            {"unit": "A", "on_hand": 2},
            {"unit": "B", "on_hand": 3},
        ]));
        let report = engine().compute_raw(&rows, ComputeOptions::default());
        let order: Vec<&str> = report.rows.iter().map(|r| r.row.unit.as_str()).collect();
        assert_eq!(order, ["C", "A", "B"]);
        let units: Vec<&str> = report.units.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(units, ["A", "B", "C"]);
    }

    #[test]
    fn aliases_merge_units_and_groups() {
        let rows = raw(json!([
            {"unit": "1/2 cav", "on_hand": 10, "destroyed_by_day": [1]},
            {"unit": "1-2CAV", "on_hand": 20, "destroyed_by_day": [2]},
            {"unit": "3-2 CAV", "on_hand": 30, "destroyed_by_day": [3]},
        ]));
        let report = engine().compute_raw(&rows, ComputeOptions::for_day(1).with_modeling(false));

        assert_eq!(report.units.len(), 2);
        let cav = report.unit("1-2 CAV").unwrap();
        assert_eq!(cav.on_hand, Count::new(30));
        assert_eq!(cav.destroyed, Count::new(3));

        let [inside, outside] = &report.groups;
        assert_eq!(inside.name, "TF IRON");
        assert_eq!(inside.on_hand, Count::new(30));
        assert_eq!(outside.name, "REST");
        assert_eq!(outside.on_hand, Count::new(30));
        assert_eq!(report.group("REST").unwrap().destroyed, Count::new(3));
    }

    #[test]
    fn hand_built_rows_are_canonicalized() {
        let row = Row {
            unit: " 1/2  cav".into(),
            unit_label: "1/2 cav".into(),
            category: "TANK".into(),
            on_hand: Count::new(10),
            rate: Some(RatePct::new(10.0)),
            destroyed_by_day: DailyLosses::zero(),
        };
        let report = engine().compute(vec![row], ComputeOptions::default());
        assert_eq!(report.rows[0].row.unit, "1-2 CAV");
        assert_eq!(report.groups[0].rows, 1);
    }

    #[test]
    fn totals_match_rows() {
        let rows = raw(json!([
            {"unit": "A", "on_hand": 44, "rate": 5, "destroyed_by_day": [0, 1, 0, 0, 0]},
            {"unit": "B", "on_hand": 0, "rate": 50},
            {"unit": "C", "on_hand": "12", "destroyed": 4},
        ]));
        let report = engine().compute_raw(&rows, ComputeOptions::for_day(3));
        let on_hand: u64 = report.rows.iter().map(|r| r.row.on_hand.get()).sum();
        let remaining: u64 = report.rows.iter().map(|r| r.remaining.get()).sum();
        assert_eq!(report.totals.on_hand.get(), on_hand);
        assert_eq!(report.totals.remaining.get(), remaining);
        assert_eq!(
            report.totals.on_hand.get(),
            report.totals.remaining.get() + report.totals.destroyed.get()
        );
    }

    #[test]
    fn empty_input_is_fine() {
        let report = engine().compute(Vec::new(), ComputeOptions::default());
        assert!(report.rows.is_empty());
        assert!(report.units.is_empty());
        assert_eq!(report.groups.len(), 2);
        assert_eq!(report.totals.days_to_threshold, Projection::Unreachable);
        assert_eq!(report.totals.combat_power_pct, 0.0);
    }

    #[test]
    fn report_serializes() {
        let rows = raw(json!([{"unit": "A", "on_hand": 10, "rate": 50}]));
        let report = engine().compute_raw(&rows, ComputeOptions::for_day(2));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["day"], json!(2));
        assert_eq!(value["policy"], json!("manual-wins"));
        assert_eq!(value["rows"][0]["unit"], json!("A"));
        // 10 * 0.5^2 = 2.5 remaining; 7.5 destroyed rounds to 8.
        assert_eq!(value["rows"][0]["remaining"], json!(2));
        assert_eq!(value["rows"][0]["days_to_threshold"], json!(1));
        assert_eq!(value["groups"][1]["name"], json!("REST"));
    }

    #[test]
    fn engine_is_debug() {
        let debug = format!("{:?}", engine());
        assert!(debug.contains("RollupEngine"));
    }
}
