//! Shared builders for integration tests.

use attrition_core::config::{AliasTable, EngineConfig, GroupPartition};
use attrition_core::types::{Count, DailyLosses, RatePct, RawRow, Row};
use attrition_rollup::RollupEngine;

/// A normalized row. `unit` is used for both the canonical id and the label;
/// the engine canonicalizes it again on compute.
pub fn row(unit: &str, category: &str, on_hand: u64, rate: Option<f64>, losses: [u64; 5]) -> Row {
    Row {
        unit: unit.to_string(),
        unit_label: unit.to_string(),
        category: category.to_string(),
        on_hand: Count::new(on_hand),
        rate: rate.map(RatePct::new),
        destroyed_by_day: DailyLosses::new(losses.map(Count::new)),
    }
}

/// Raw rows from a JSON array literal.
pub fn raw_rows(json: &str) -> Vec<RawRow> {
    attrition_core::normalize::parse_rows(json).unwrap()
}

/// Engine over the compound model with default configuration.
pub fn engine() -> RollupEngine {
    RollupEngine::compound(EngineConfig::default()).unwrap()
}

/// Config with `A CO` known by two other spellings, and a partition holding
/// `A CO` and `B CO`.
pub fn brigade_config() -> EngineConfig {
    let aliases = AliasTable::new()
        .with_aliases("A CO", ["ALPHA", "A COMPANY"])
        .unwrap()
        .with_aliases("B CO", ["BRAVO"])
        .unwrap();
    EngineConfig {
        aliases,
        partition: GroupPartition {
            name: "TASK FORCE".into(),
            members: vec!["alpha".into(), "B CO".into()],
            others_name: "ATTACHED".into(),
        },
        ..EngineConfig::default()
    }
}

/// Engine over [`brigade_config`].
pub fn brigade_engine() -> RollupEngine {
    RollupEngine::compound(brigade_config()).unwrap()
}
