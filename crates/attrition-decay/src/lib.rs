//! # attrition-decay: Compound attrition model.
//!
//! A unit loses a constant fraction `p` of its remaining strength every day,
//! so after `d` days `remaining = start * (1 - p)^d`. This crate provides:
//! - **Forward projection**: remaining strength after `d` days.
//! - **Rate inference**: the constant `p` that reproduces an observed
//!   cumulative loss, the near-inverse of forward projection.
//! - **Threshold projection**: the first whole day the remaining fraction
//!   falls to or below a target.
//!
//! All functions are total and side-effect free.

pub mod engine;
pub mod inference;
pub mod survival;
pub mod threshold;

pub use engine::CompoundDecay;
pub use inference::{infer_rate, infer_rate_from_cumulative};
pub use survival::{remaining, trajectory};
pub use threshold::days_to_fraction;
