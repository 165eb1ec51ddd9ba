//! Total normalization of identifiers, loss sequences, and whole rows.
//!
//! Nothing here fails. Malformed input is folded to a canonical form or to
//! zero, following the conversions on [`Count`] and [`RatePct`].

use serde_json::Value;

use crate::config::AliasTable;
use crate::constants::UNASSIGNED_UNIT;
use crate::error::InputError;
use crate::types::{Count, DailyLosses, RatePct, RawRow, Row};

/// Trim, collapse runs of whitespace to one space, and uppercase.
///
/// # Examples
///
/// ```
/// use attrition_core::normalize::collapse_identifier;
/// assert_eq!(collapse_identifier("  2nd   bde\tcbt "), "2ND BDE CBT");
/// assert_eq!(collapse_identifier("   "), "");
/// ```
pub fn collapse_identifier(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Canonical unit identifier: collapsed, uppercased, then folded through the
/// alias table. Blank input maps to [`UNASSIGNED_UNIT`].
pub fn canonical_unit(raw: &str, aliases: &AliasTable) -> String {
    let folded = collapse_identifier(raw);
    if folded.is_empty() {
        return UNASSIGNED_UNIT.to_string();
    }
    match aliases.resolve(&folded) {
        Some(canonical) => canonical.to_string(),
        None => folded,
    }
}

/// Render an identifier-like JSON value as text. Numbers keep their JSON
/// spelling; anything that is not a string or number is blank.
pub fn identifier_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Normalize a daily-loss input to exactly five non-negative counts.
///
/// - absent or null: all zero
/// - array: first five entries, padded with zero
/// - bare number or numeric string: taken as the day-1 figure
/// - anything else: all zero
pub fn normalize_daily_losses(value: Option<&Value>) -> DailyLosses {
    match value {
        Some(Value::Array(items)) => DailyLosses::from_counts(items.iter().map(Count::from_value)),
        Some(scalar @ (Value::Number(_) | Value::String(_))) => {
            DailyLosses::from_counts([Count::from_value(scalar)])
        }
        _ => DailyLosses::zero(),
    }
}

/// Normalize a raw row. The legacy `destroyed` scalar is used as the day-1
/// figure only when no daily sequence is present.
pub fn normalize_row(raw: &RawRow, aliases: &AliasTable) -> Row {
    let unit_label = identifier_text(&raw.unit);
    let unit = canonical_unit(&unit_label, aliases);
    let category = collapse_identifier(&identifier_text(&raw.category));

    let destroyed_by_day = match (&raw.destroyed_by_day, &raw.destroyed) {
        (Some(seq), _) => normalize_daily_losses(Some(seq)),
        (None, Some(legacy)) => DailyLosses::from_counts([Count::from_value(legacy)]),
        (None, None) => DailyLosses::zero(),
    };

    Row {
        unit,
        unit_label,
        category,
        on_hand: Count::from_value(&raw.on_hand),
        rate: RatePct::from_value(&raw.rate),
        destroyed_by_day,
    }
}

/// Parse a JSON document holding an array of row objects.
///
/// This is the one place input can be rejected: the document itself must be
/// valid JSON and an array of objects. Field contents are never rejected.
pub fn parse_rows(document: &str) -> Result<Vec<RawRow>, InputError> {
    let value: Value =
        serde_json::from_str(document).map_err(|e| InputError::Malformed(e.to_string()))?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(_) => return Err(InputError::NotAnArray("object")),
        Value::Null => return Err(InputError::NotAnArray("null")),
        Value::Bool(_) => return Err(InputError::NotAnArray("boolean")),
        Value::Number(_) => return Err(InputError::NotAnArray("number")),
        Value::String(_) => return Err(InputError::NotAnArray("string")),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(RawRow::from_map(&map)),
            _ => Err(InputError::RowNotAnObject(index)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn aliases() -> AliasTable {
        AliasTable::new()
            .with_aliases("1-2 CAV", ["1/2 CAV", "1-2cav", "1st sqn 2nd cav"])
            .unwrap()
    }

    // --- identifiers ---

    #[test]
    fn canonical_unit_uppercases_and_collapses() {
        let table = AliasTable::new();
        assert_eq!(canonical_unit(" a  co ", &table), "A CO");
    }

    #[test]
    fn canonical_unit_folds_aliases() {
        let table = aliases();
        assert_eq!(canonical_unit("1/2 cav", &table), "1-2 CAV");
        assert_eq!(canonical_unit("1-2CAV", &table), "1-2 CAV");
        assert_eq!(canonical_unit("1st  Sqn 2nd  Cav", &table), "1-2 CAV");
        assert_eq!(canonical_unit("1-2 cav", &table), "1-2 CAV");
        assert_eq!(canonical_unit("3-2 CAV", &table), "3-2 CAV");
    }

    #[test]
    fn canonical_unit_blank_is_unassigned() {
        assert_eq!(canonical_unit("", &AliasTable::new()), UNASSIGNED_UNIT);
        assert_eq!(canonical_unit(" \t ", &AliasTable::new()), UNASSIGNED_UNIT);
    }

    #[test]
    fn identifier_text_handles_numbers() {
        assert_eq!(identifier_text(&json!(101)), "101");
        assert_eq!(identifier_text(&json!(null)), "");
        assert_eq!(identifier_text(&json!({"a": 1})), "");
    }

    // --- daily losses ---

    #[test]
    fn losses_absent_is_zero() {
        assert_eq!(normalize_daily_losses(None), DailyLosses::zero());
        assert_eq!(normalize_daily_losses(Some(&json!(null))), DailyLosses::zero());
    }

    #[test]
    fn losses_garbage_entries_become_zero() {
        let losses = normalize_daily_losses(Some(&json!([3, -2, "x", 1.9, null, 7])));
        let expected = DailyLosses::new([3, 0, 0, 1, 0].map(Count::new));
        assert_eq!(losses, expected);
    }

    #[test]
    fn losses_short_array_pads() {
        let losses = normalize_daily_losses(Some(&json!([4])));
        assert_eq!(losses, DailyLosses::new([4, 0, 0, 0, 0].map(Count::new)));
    }

    #[test]
    fn losses_scalar_is_day_one() {
        let losses = normalize_daily_losses(Some(&json!("6")));
        assert_eq!(losses, DailyLosses::new([6, 0, 0, 0, 0].map(Count::new)));
    }

    #[test]
    fn losses_object_is_zero() {
        assert_eq!(normalize_daily_losses(Some(&json!({"d1": 3}))), DailyLosses::zero());
    }

    // --- rows ---

    #[test]
    fn normalize_row_full() {
        let raw: RawRow = serde_json::from_value(json!({
            "unit": " 1/2 cav ",
            "category": "m1a2  tank",
            "on_hand": 44,
            "rate": 2.5,
            "destroyed_by_day": [0, 1, 0, 0, 0]
        }))
        .unwrap();
        let row = normalize_row(&raw, &aliases());
        assert_eq!(row.unit, "1-2 CAV");
        assert_eq!(row.unit_label, "1/2 cav");
        assert_eq!(row.category, "M1A2 TANK");
        assert_eq!(row.on_hand, Count::new(44));
        assert_eq!(row.rate, Some(RatePct::new(2.5)));
        assert_eq!(row.destroyed_by_day.total(), Count::new(1));
    }

    #[test]
    fn normalize_row_legacy_destroyed() {
        let raw: RawRow = serde_json::from_value(json!({
            "unit": "A CO",
            "on_hand": 10,
            "destroyed": 3
        }))
        .unwrap();
        let row = normalize_row(&raw, &AliasTable::new());
        assert_eq!(row.destroyed_by_day, DailyLosses::new([3, 0, 0, 0, 0].map(Count::new)));
        assert_eq!(row.rate, None);
    }

    #[test]
    fn normalize_row_sequence_beats_legacy() {
        let raw: RawRow = serde_json::from_value(json!({
            "on_hand": 10,
            "destroyed": 9,
            "destroyed_by_day": [1, 1]
        }))
        .unwrap();
        let row = normalize_row(&raw, &AliasTable::new());
        assert_eq!(row.destroyed_by_day.total(), Count::new(2));
    }

    #[test]
    fn normalize_row_empty_object() {
        let row = normalize_row(&RawRow::default(), &AliasTable::new());
        assert_eq!(row.unit, UNASSIGNED_UNIT);
        assert_eq!(row.on_hand, Count::ZERO);
        assert_eq!(row.rate, None);
        assert_eq!(row.destroyed_by_day, DailyLosses::zero());
    }

    // --- parse_rows ---

    #[test]
    fn parse_rows_accepts_array_of_objects() {
        let rows = parse_rows(r#"[{"unit": "A"}, {"unit": "B", "on_hand": "5"}]"#).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].on_hand, json!("5"));
    }

    #[test]
    fn parse_rows_rejects_non_array() {
        assert_eq!(parse_rows("{}"), Err(InputError::NotAnArray("object")));
        assert_eq!(parse_rows("12"), Err(InputError::NotAnArray("number")));
    }

    #[test]
    fn parse_rows_rejects_non_object_row() {
        assert_eq!(parse_rows(r#"[{}, 3]"#), Err(InputError::RowNotAnObject(1)));
    }

    #[test]
    fn parse_rows_tolerates_duplicate_spellings() {
        let rows = parse_rows(
            r#"[
                {"unit": "A", "on_hand": 10, "onHand": 12},
                {"unit": "B", "rate": 5, "attrition_rate": 9, "destroyed_by_day": [1], "destroyedByDay": [2]},
                {"unitId": "C", "on_hand": 3}
            ]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].on_hand, json!(10));
        assert_eq!(rows[1].rate, json!(5));
        assert_eq!(rows[1].destroyed_by_day, Some(json!([1])));
        assert_eq!(rows[2].unit, json!("C"));
    }

    #[test]
    fn parse_rows_rejects_bad_json() {
        assert!(matches!(parse_rows("[{"), Err(InputError::Malformed(_))));
    }
}
