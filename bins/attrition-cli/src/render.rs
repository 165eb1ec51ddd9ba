//! Plain-text rendering of reports and projections.

use std::fmt::Write;

use attrition_core::types::{ComputedRow, Summary};
use attrition_rollup::AttritionReport;

fn summary_header(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "  {:<24} {:>5} {:>9} {:>9} {:>9} {:>7} {:>9} {:>11}",
        "NAME", "ROWS", "ON HAND", "DESTROYED", "REMAINING", "CP %", "RATE %", "THRESHOLD"
    );
}

fn summary_line(out: &mut String, s: &Summary) {
    let _ = writeln!(
        out,
        "  {:<24} {:>5} {:>9} {:>9} {:>9} {:>7.1} {:>9.3} {:>11}",
        s.name,
        s.rows,
        s.on_hand,
        s.destroyed,
        s.remaining,
        s.combat_power_pct,
        s.weighted_rate.pct(),
        s.days_to_threshold
    );
}

fn row_line(out: &mut String, r: &ComputedRow) {
    let _ = writeln!(
        out,
        "  {:<16} {:<16} {:>7} {:>6} {:>6} {:>6} {:>9} {:>7.1} {:>9.3} {:>11}",
        r.row.unit,
        r.row.category,
        r.row.on_hand,
        r.destroyed_manual,
        r.destroyed_model,
        r.destroyed_final,
        r.remaining,
        r.combat_power_pct,
        r.effective_rate.pct(),
        r.days_to_threshold
    );
}

/// Render a full report as aligned text tables.
pub fn report_text(report: &AttritionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Attrition report: {}, modeling {}, policy {}, threshold {:.0}%",
        report.day,
        if report.modeling { "on" } else { "off" },
        report.policy,
        report.target_fraction * 100.0
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "ROWS");
    let _ = writeln!(
        out,
        "  {:<16} {:<16} {:>7} {:>6} {:>6} {:>6} {:>9} {:>7} {:>9} {:>11}",
        "UNIT", "CATEGORY", "ON HAND", "MANUAL", "MODEL", "FINAL", "REMAINING", "CP %", "RATE %",
        "THRESHOLD"
    );
    report.rows.iter().for_each(|r| row_line(&mut out, r));
    let _ = writeln!(out);

    summary_header(&mut out, "UNITS");
    report.units.iter().for_each(|s| summary_line(&mut out, s));
    let _ = writeln!(out);

    summary_header(&mut out, "GROUPS");
    report.groups.iter().for_each(|s| summary_line(&mut out, s));
    summary_line(&mut out, &report.totals);

    out
}

/// Render a forward trajectory, one line per day.
pub fn trajectory_text(values: &[f64]) -> String {
    let mut out = String::new();
    for (day, value) in values.iter().enumerate() {
        let _ = writeln!(out, "  day {day:>3}: {value:>12.3}");
    }
    out
}
