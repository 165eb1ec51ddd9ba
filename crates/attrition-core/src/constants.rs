//! Engine constants. Counts are whole items; rates are percentages.

/// Length of the observation window in days.
///
/// # Examples
///
/// ```
/// use attrition_core::constants::{DAY_COUNT, FIRST_DAY, LAST_DAY};
/// assert_eq!(DAY_COUNT, 5);
/// assert_eq!(LAST_DAY as usize, DAY_COUNT);
/// assert_eq!(FIRST_DAY, 1);
/// ```
pub const DAY_COUNT: usize = 5;
pub const FIRST_DAY: u32 = 1;
pub const LAST_DAY: u32 = DAY_COUNT as u32;

pub const RATE_MIN_PCT: f64 = 0.0;
pub const RATE_MAX_PCT: f64 = 100.0;
pub const PERCENT: f64 = 100.0;

/// Default threshold fraction for day-to-threshold projections.
pub const DEFAULT_TARGET_FRACTION: f64 = 0.5;

/// Token used when a row carries no usable unit identifier.
pub const UNASSIGNED_UNIT: &str = "UNASSIGNED";

pub const DEFAULT_PARTITION_NAME: &str = "PRIMARY";
pub const DEFAULT_OTHERS_NAME: &str = "OTHER";

/// Name of the grand-total summary in a report.
pub const TOTALS_NAME: &str = "ALL";
