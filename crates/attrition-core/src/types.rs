//! Core domain types: counts, rates, days, input rows, and computed outputs.
//!
//! Every numeric wrapper here is constructed through a total conversion, so a
//! value of one of these types is always in range. Nothing in this module
//! returns an error for malformed numbers; invalid input maps to zero (or the
//! nearest bound) instead.

use std::fmt;
use std::iter::Sum;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::constants::{DAY_COUNT, FIRST_DAY, LAST_DAY, PERCENT, RATE_MAX_PCT, RATE_MIN_PCT};

// --- Count ---

/// A non-negative whole number of equipment items.
///
/// # Examples
///
/// ```
/// use attrition_core::types::Count;
/// assert_eq!(Count::from_f64(3.9), Count::new(3));
/// assert_eq!(Count::from_f64(-2.0), Count::ZERO);
/// assert_eq!(Count::from_f64(f64::NAN), Count::ZERO);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Count(u64);

impl Count {
    pub const ZERO: Count = Count(0);

    pub const fn new(value: u64) -> Self {
        Count(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Floor a real number into a count. Negative, NaN, and infinite input
    /// all become zero; values past `u64::MAX` saturate.
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Count(value.floor() as u64)
        } else {
            Count::ZERO
        }
    }

    /// Read a count out of loosely typed JSON.
    ///
    /// Numbers go through [`Count::from_f64`], numeric strings are parsed
    /// first, and everything else (null, booleans, arrays, objects,
    /// unparsable strings) is zero.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(v) => Count(v),
                None => Self::from_f64(n.as_f64().unwrap_or(0.0)),
            },
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(Self::from_f64)
                .unwrap_or(Count::ZERO),
            _ => Count::ZERO,
        }
    }

    pub fn saturating_add(self, other: Count) -> Count {
        Count(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Count) -> Count {
        Count(self.0.saturating_sub(other.0))
    }

    /// Clamp into `[0, ceiling]`.
    pub fn at_most(self, ceiling: Count) -> Count {
        self.min(ceiling)
    }
}

impl From<u64> for Count {
    fn from(value: u64) -> Self {
        Count(value)
    }
}

impl Sum for Count {
    fn sum<I: Iterator<Item = Count>>(iter: I) -> Self {
        iter.fold(Count::ZERO, Count::saturating_add)
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

// --- RatePct ---

/// A daily attrition rate expressed as a percentage in `[0, 100]`.
///
/// # Examples
///
/// ```
/// use attrition_core::types::RatePct;
/// assert_eq!(RatePct::new(150.0).pct(), 100.0);
/// assert_eq!(RatePct::new(-5.0).pct(), 0.0);
/// assert_eq!(RatePct::new(25.0).fraction(), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct RatePct(f64);

impl RatePct {
    pub const ZERO: RatePct = RatePct(RATE_MIN_PCT);
    pub const FULL: RatePct = RatePct(RATE_MAX_PCT);

    /// Clamp `pct` into `[0, 100]`. NaN becomes zero.
    pub fn new(pct: f64) -> Self {
        if pct.is_nan() {
            RatePct::ZERO
        } else {
            RatePct(pct.clamp(RATE_MIN_PCT, RATE_MAX_PCT))
        }
    }

    /// Build a rate from a per-day loss fraction `p`.
    pub fn from_fraction(p: f64) -> Self {
        Self::new(p * PERCENT)
    }

    /// Read a rate out of loosely typed JSON. Returns `None` when no numeric
    /// value is present at all, so callers can tell "absent" from "zero".
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_f64().map(Self::new),
            Value::String(s) => {
                let trimmed = s.trim().trim_end_matches('%').trim_end();
                trimmed.parse::<f64>().ok().map(Self::new)
            }
            _ => None,
        }
    }

    pub fn pct(self) -> f64 {
        self.0
    }

    /// The per-day loss fraction `p = pct / 100`.
    pub fn fraction(self) -> f64 {
        self.0 / PERCENT
    }

    pub fn is_zero(self) -> bool {
        self.0 <= RATE_MIN_PCT
    }
}

impl From<f64> for RatePct {
    fn from(pct: f64) -> Self {
        RatePct::new(pct)
    }
}

impl From<RatePct> for f64 {
    fn from(rate: RatePct) -> Self {
        rate.0
    }
}

impl fmt::Display for RatePct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}%", self.0)
    }
}

// --- Day ---

/// A selected day of the observation window, always in `[1, DAY_COUNT]`.
///
/// # Examples
///
/// ```
/// use attrition_core::types::Day;
/// assert_eq!(Day::new(0).get(), 1);
/// assert_eq!(Day::new(3).get(), 3);
/// assert_eq!(Day::new(99).get(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "f64", into = "u32")]
pub struct Day(u32);

impl Day {
    pub const FIRST: Day = Day(FIRST_DAY);
    pub const LAST: Day = Day(LAST_DAY);

    pub fn new(day: i64) -> Self {
        Day(day.clamp(FIRST_DAY as i64, LAST_DAY as i64) as u32)
    }

    /// Floor and clamp a real-valued day. NaN selects the first day.
    pub fn from_f64(day: f64) -> Self {
        if day.is_nan() {
            Day::FIRST
        } else {
            Day::new(day.floor() as i64)
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Zero-based slot index into a [`DailyLosses`] sequence.
    pub fn index(self) -> usize {
        (self.0 - FIRST_DAY) as usize
    }

    /// Every day of the window in order.
    pub fn all() -> impl Iterator<Item = Day> {
        (FIRST_DAY..=LAST_DAY).map(Day)
    }
}

impl Default for Day {
    fn default() -> Self {
        Day::FIRST
    }
}

/// Deserialized days go through [`Day::from_f64`], so `2.5`, `-1`, or `40`
/// in a document still select a day inside the window.
impl From<f64> for Day {
    fn from(day: f64) -> Self {
        Day::from_f64(day)
    }
}

impl From<Day> for u32 {
    fn from(day: Day) -> Self {
        day.0
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {}", self.0)
    }
}

// --- DailyLosses ---

/// Manual destroyed counts for each day of the window. Slot 0 is day 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DailyLosses([Count; DAY_COUNT]);

impl DailyLosses {
    pub const fn new(slots: [Count; DAY_COUNT]) -> Self {
        DailyLosses(slots)
    }

    pub fn zero() -> Self {
        DailyLosses([Count::ZERO; DAY_COUNT])
    }

    /// Fill from any sequence: extra entries are dropped, missing ones are zero.
    pub fn from_counts<I: IntoIterator<Item = Count>>(counts: I) -> Self {
        let mut slots = [Count::ZERO; DAY_COUNT];
        for (slot, count) in slots.iter_mut().zip(counts) {
            *slot = count;
        }
        DailyLosses(slots)
    }

    /// Cumulative losses from day 1 through `day` inclusive. Slot 0 holds day
    /// 1, so a loss in slot 1 is not counted until day 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use attrition_core::types::{Count, DailyLosses, Day};
    /// let losses = DailyLosses::new([0, 1, 0, 0, 0].map(Count::new));
    /// assert_eq!(losses.through(Day::new(1)), Count::ZERO);
    /// assert_eq!(losses.through(Day::new(2)), Count::new(1));
    /// ```
    pub fn through(&self, day: Day) -> Count {
        self.0[..=day.index()].iter().copied().sum()
    }

    pub fn total(&self) -> Count {
        self.0.iter().copied().sum()
    }
}

// --- Projection ---

/// Outcome of a day-to-threshold projection.
///
/// Serializes as the bare day number, or the string `"unreachable"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Projection {
    /// The threshold is first reached on this day (0 means already reached).
    Day(u32),
    /// No future day crosses the threshold under the given rate.
    Unreachable,
}

impl Projection {
    pub fn day(self) -> Option<u32> {
        match self {
            Projection::Day(d) => Some(d),
            Projection::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Projection::Day(_))
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Projection::Day(d) => serializer.serialize_u32(*d),
            Projection::Unreachable => serializer.serialize_str("unreachable"),
        }
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Day(d) => fmt::Display::fmt(d, f),
            Projection::Unreachable => f.pad("unreachable"),
        }
    }
}

// --- Reconciliation ---

/// How manual reports and the model estimate combine into a final loss figure.
///
/// Both policies are deliberate options; the caller picks one per computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reconciliation {
    /// Final loss is the larger of the manual report and the model estimate.
    /// The model can raise a manual figure but never lower it.
    #[default]
    ManualWins,
    /// Final loss is the model estimate whenever modeling is enabled, even
    /// when that is below the manual report.
    ModelWins,
}

impl Reconciliation {
    /// Combine a manual count with an optional model estimate. `None` means
    /// modeling is disabled, in which case the manual count always stands.
    ///
    /// # Examples
    ///
    /// ```
    /// use attrition_core::types::{Count, Reconciliation};
    /// let manual = Count::new(10);
    /// let modeled = Some(Count::new(6));
    /// assert_eq!(Reconciliation::ManualWins.reconcile(manual, modeled), Count::new(10));
    /// assert_eq!(Reconciliation::ModelWins.reconcile(manual, modeled), Count::new(6));
    /// assert_eq!(Reconciliation::ModelWins.reconcile(manual, None), Count::new(10));
    /// ```
    pub fn reconcile(self, manual: Count, modeled: Option<Count>) -> Count {
        match (self, modeled) {
            (_, None) => manual,
            (Reconciliation::ManualWins, Some(m)) => manual.max(m),
            (Reconciliation::ModelWins, Some(m)) => m,
        }
    }
}

impl fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reconciliation::ManualWins => f.write_str("manual-wins"),
            Reconciliation::ModelWins => f.write_str("model-wins"),
        }
    }
}

/// Where a computed row's effective rate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Reported,
    Inferred,
}

// --- Rows ---

/// A loosely typed input row as supplied by an import adapter.
///
/// Every field is optional and accepts any JSON value; [`crate::normalize`]
/// turns it into a [`Row`] without ever failing. Each field may be spelled
/// several ways (see [`RawRow::from_map`]); deserialization never rejects an
/// object because of what its fields contain.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RawRow {
    pub unit: Value,
    pub category: Value,
    pub on_hand: Value,
    pub rate: Value,
    pub destroyed_by_day: Option<Value>,
    /// Legacy single destroyed figure, used only when no daily sequence is given.
    pub destroyed: Option<Value>,
}

const UNIT_KEYS: &[&str] = &["unit", "unitId", "unit_id"];
const CATEGORY_KEYS: &[&str] = &["category", "equipment", "type"];
const ON_HAND_KEYS: &[&str] = &["on_hand", "onHand"];
const RATE_KEYS: &[&str] = &["rate", "attrition_rate", "attritionRate", "rate_pct"];
const DESTROYED_BY_DAY_KEYS: &[&str] = &["destroyed_by_day", "destroyedByDay"];
const DESTROYED_KEYS: &[&str] = &["destroyed"];

/// First non-null value among `keys`, in key order.
fn first_present(map: &Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
        .cloned()
}

impl RawRow {
    /// Build a row from a JSON object. When a field appears under more than
    /// one spelling, the first non-null one in the order below wins:
    ///
    /// - `unit`, `unitId`, `unit_id`
    /// - `category`, `equipment`, `type`
    /// - `on_hand`, `onHand`
    /// - `rate`, `attrition_rate`, `attritionRate`, `rate_pct`
    /// - `destroyed_by_day`, `destroyedByDay`
    /// - `destroyed`
    ///
    /// Unknown keys are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        RawRow {
            unit: first_present(map, UNIT_KEYS).unwrap_or_default(),
            category: first_present(map, CATEGORY_KEYS).unwrap_or_default(),
            on_hand: first_present(map, ON_HAND_KEYS).unwrap_or_default(),
            rate: first_present(map, RATE_KEYS).unwrap_or_default(),
            destroyed_by_day: first_present(map, DESTROYED_BY_DAY_KEYS),
            destroyed: first_present(map, DESTROYED_KEYS),
        }
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(RawRow::from_map(&map))
    }
}

/// A normalized input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Canonical unit identifier after alias folding.
    pub unit: String,
    /// The unit label as supplied, trimmed.
    pub unit_label: String,
    pub category: String,
    pub on_hand: Count,
    /// Reported rate, if the row carried one.
    pub rate: Option<RatePct>,
    pub destroyed_by_day: DailyLosses,
}

/// A row with every derived figure for one selected day and policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedRow {
    #[serde(flatten)]
    pub row: Row,
    pub day: Day,
    /// Effective rate used for modeling and projection.
    pub effective_rate: RatePct,
    pub rate_source: RateSource,
    /// Model estimate through `day`; zero when modeling is disabled.
    pub destroyed_model: Count,
    /// Manual losses through `day`, clamped to on-hand.
    pub destroyed_manual: Count,
    /// Manual losses across the whole window, clamped to on-hand.
    pub destroyed_manual_total: Count,
    pub destroyed_final: Count,
    pub remaining: Count,
    pub combat_power_pct: f64,
    pub days_to_threshold: Projection,
}

/// Aggregate over a set of computed rows: a unit, a partition group, or the
/// whole report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub name: String,
    pub rows: usize,
    pub on_hand: Count,
    pub remaining: Count,
    pub destroyed: Count,
    pub combat_power_pct: f64,
    /// On-hand weighted mean of member effective rates.
    pub weighted_rate: RatePct,
    pub days_to_threshold: Projection,
}

/// `remaining / on_hand * 100`, or 0 when there is nothing on hand.
pub fn combat_power_pct(remaining: Count, on_hand: Count) -> f64 {
    if on_hand.is_zero() {
        return 0.0;
    }
    remaining.as_f64() / on_hand.as_f64() * PERCENT
}
