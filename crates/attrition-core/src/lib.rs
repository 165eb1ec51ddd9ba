//! # attrition-core
//! Foundation types, configuration, and traits for the attrition engine.

pub mod config;
pub mod constants;
pub mod error;
pub mod normalize;
pub mod traits;
pub mod types;
