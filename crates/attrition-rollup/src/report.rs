//! The output of one engine computation.

use serde::Serialize;

use attrition_core::types::{ComputedRow, Day, Reconciliation, Summary};

/// Everything produced by a single [`RollupEngine::compute`] call.
///
/// [`RollupEngine::compute`]: crate::engine::RollupEngine::compute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttritionReport {
    pub day: Day,
    pub modeling: bool,
    pub policy: Reconciliation,
    pub target_fraction: f64,
    /// Computed rows in input order.
    pub rows: Vec<ComputedRow>,
    /// One entry per canonical unit, sorted by identifier.
    pub units: Vec<Summary>,
    /// The named partition group, then everything else.
    pub groups: [Summary; 2],
    pub totals: Summary,
}

impl AttritionReport {
    pub fn unit(&self, name: &str) -> Option<&Summary> {
        self.units.iter().find(|s| s.name == name)
    }

    pub fn group(&self, name: &str) -> Option<&Summary> {
        self.groups.iter().find(|s| s.name == name)
    }
}
