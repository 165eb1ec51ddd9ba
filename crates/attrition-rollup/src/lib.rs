//! # attrition-rollup: Per-row computation and rollups.
//!
//! Applies an [`AttritionModel`](attrition_core::traits::AttritionModel) to
//! every row for a selected day and reconciliation policy, then aggregates the
//! results into per-unit summaries, a fixed two-way group split, and a grand
//! total. Every call is a full recomputation; nothing is retained between
//! calls.

pub mod engine;
pub mod report;
pub mod rollup;
pub mod row;

pub use engine::{ComputeOptions, RollupEngine};
pub use report::AttritionReport;
pub use rollup::SummaryBuilder;
pub use row::compute_row;
