//! Report command for printing a day's compliance summary.
//!
//! This module implements `elog report` with human-readable and JSON output.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use elog_core::{ComplianceResult, format_hours};

use crate::commands::day::Day;
use crate::{Config, DayArgs};

/// Formats a segment boundary; the day's closing instant prints as `24:00`.
fn clock(ts: DateTime<FixedOffset>, day_end: DateTime<FixedOffset>) -> String {
    if ts == day_end {
        "24:00".to_string()
    } else {
        ts.format("%H:%M").to_string()
    }
}

/// Formats the human-readable report output.
pub fn format_report(result: &ComplianceResult) -> String {
    let mut output = String::new();

    // Header
    let day = result.day_start.date_naive();
    writeln!(output, "DUTY STATUS REPORT: {}", day.format("%A, %b %-d, %Y")).unwrap();
    writeln!(
        output,
        "Day starts {} (UTC{})",
        result.day_start.format("%Y-%m-%d %H:%M"),
        result.day_start.offset()
    )
    .unwrap();

    // TOTALS section
    writeln!(output).unwrap();
    writeln!(output, "TOTALS").unwrap();
    writeln!(output, "──────").unwrap();
    for (status, hours) in result.totals_by_status.iter() {
        writeln!(output, "{:<5}{:>6}", status.label(), format_hours(hours)).unwrap();
    }
    let total = format_hours(result.totals_by_status.sum());
    writeln!(output, "{:<5}{total:>6}", "Total").unwrap();

    writeln!(output).unwrap();
    let verdict = if result.driving_violation {
        "VIOLATION"
    } else {
        "ok"
    };
    writeln!(output, "Driving: {verdict}").unwrap();

    // SEGMENTS section
    writeln!(output).unwrap();
    writeln!(output, "SEGMENTS").unwrap();
    writeln!(output, "────────").unwrap();
    for segment in &result.segments {
        let marker = if segment.violation { "  !" } else { "" };
        writeln!(
            output,
            "{}-{}  {:<3} {:>5}{marker}",
            clock(segment.start_time, result.day_end),
            clock(segment.end_time, result.day_end),
            segment.status.label(),
            format_hours(segment.hours()),
        )
        .unwrap();
    }

    output
}

/// Formats the evaluation as JSON.
pub fn format_report_json(result: &ComplianceResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

// ========== Public Interface ==========

pub fn run<W: Write>(writer: &mut W, config: &Config, args: &DayArgs, json: bool) -> Result<()> {
    let day = Day::load(config, args)?;
    let result = day.evaluate();

    if json {
        writeln!(writer, "{}", format_report_json(&result)?)?;
    } else {
        write!(writer, "{}", format_report(&result))?;
    }

    Ok(())
}
