//! Start-of-day conditions carried over from before the visible day.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::input::{RawNumber, RawOptions};
use crate::status::DutyStatus;

/// Where the driver stood when the day began.
///
/// The hour counters carry partial clocks from a prior day, e.g. a driver who
/// was already three hours into a duty window at midnight.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceConfig {
    /// Status in effect from the day boundary until the first event.
    pub start_status: DutyStatus,
    /// Consecutive off-duty hours already accumulated.
    pub start_off_duty_hours: f64,
    /// Driving hours already counted toward the 11-hour limit.
    pub start_driving_hours: f64,
    /// Hours already counted toward the 14-hour window.
    pub start_duty_hours: f64,
    /// Explicit day boundary. Defaults to midnight of the first event's date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<FixedOffset>>,
}

impl ComplianceConfig {
    /// Builds a config from raw options, defaulting anything malformed.
    ///
    /// An absent or out-of-range start status becomes Off-Duty; unparseable
    /// or negative hour counters become 0; an unparseable start date is
    /// treated as absent.
    pub fn from_options(options: &RawOptions) -> Self {
        let start_status = options
            .start_status
            .as_ref()
            .and_then(|raw| {
                raw.resolve()
                    .inspect_err(|err| tracing::debug!(%err, "defaulting start status to off-duty"))
                    .ok()
            })
            .unwrap_or_default();

        let start_date = options.start_date.as_ref().and_then(|raw| {
            raw.resolve()
                .inspect_err(|err| tracing::debug!(%err, "ignoring start date"))
                .ok()
        });

        Self {
            start_status,
            start_off_duty_hours: hours(options.start_off_duty_hours.as_ref()),
            start_driving_hours: hours(options.start_driving_hours.as_ref()),
            start_duty_hours: hours(options.start_duty_hours.as_ref()),
            start_date,
        }
    }

    /// Changes the start status if `code` names a valid status.
    ///
    /// Returns whether the change was applied; an invalid code leaves the
    /// current start status in place.
    pub fn set_start_status(&mut self, code: i64) -> bool {
        match DutyStatus::from_code(code) {
            Some(status) => {
                self.start_status = status;
                true
            }
            None => false,
        }
    }
}

fn hours(raw: Option<&RawNumber>) -> f64 {
    raw.map_or(0.0, RawNumber::hours)
}
