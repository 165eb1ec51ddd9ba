//! Integration test suite for the attrition engine.
//!
//! Drives the whole pipeline (raw JSON rows in, report out) and checks the
//! conservation and ordering properties that must hold across crates.

pub mod helpers;
