//! Output of one rule-engine evaluation.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::engine::ComplianceState;
use crate::status::DutyStatus;

/// Hours spent in each status, keyed by status code when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatusTotals {
    #[serde(rename = "1")]
    pub off_duty: f64,
    #[serde(rename = "2")]
    pub sleeper_berth: f64,
    #[serde(rename = "3")]
    pub driving: f64,
    #[serde(rename = "4")]
    pub on_duty: f64,
}

impl StatusTotals {
    pub const fn get(&self, status: DutyStatus) -> f64 {
        match status {
            DutyStatus::OffDuty => self.off_duty,
            DutyStatus::SleeperBerth => self.sleeper_berth,
            DutyStatus::Driving => self.driving,
            DutyStatus::OnDuty => self.on_duty,
        }
    }

    pub(crate) fn add(&mut self, status: DutyStatus, hours: f64) {
        let slot = match status {
            DutyStatus::OffDuty => &mut self.off_duty,
            DutyStatus::SleeperBerth => &mut self.sleeper_berth,
            DutyStatus::Driving => &mut self.driving,
            DutyStatus::OnDuty => &mut self.on_duty,
        };
        *slot += hours;
    }

    /// Sum over all statuses; 24 for a log confined to one day.
    pub fn sum(&self) -> f64 {
        self.off_duty + self.sleeper_berth + self.driving + self.on_duty
    }

    /// `(status, hours)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (DutyStatus, f64)> + '_ {
        DutyStatus::ALL.into_iter().map(|status| (status, self.get(status)))
    }
}

/// One stretch of the day spent in a single status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub status: DutyStatus,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    /// Driving-violation predicate as it stood after this stretch.
    pub violation: bool,
    /// Rule clocks after this stretch was applied.
    pub state: ComplianceState,
}

impl Segment {
    pub fn hours(&self) -> f64 {
        crate::engine::hours_between(self.start_time, self.end_time)
    }
}

/// Totals, violation flag and resolved segments for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceResult {
    pub day_start: DateTime<FixedOffset>,
    pub day_end: DateTime<FixedOffset>,
    pub totals_by_status: StatusTotals,
    /// Violation predicate after the final stretch of the day.
    pub driving_violation: bool,
    pub segments: Vec<Segment>,
}

/// Formats fractional hours as `H:MM`.
///
/// Minutes are rounded; 59.5 minutes and up carries into the next hour.
pub fn format_hours(hours: f64) -> String {
    let hours = if hours.is_finite() { hours.max(0.0) } else { 0.0 };
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_minutes = (hours * 60.0).round() as u64;
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}
