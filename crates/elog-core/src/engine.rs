//! Hours-of-Service rule engine.
//!
//! Turns a day's duty-status changes into per-status totals and a driving
//! violation determination.
//!
//! # Algorithm Summary
//!
//! 1. Resolve the day boundary (explicit start date, else midnight of the
//!    first event's date) and close it 24 hours later
//! 2. Split the day into intervals: start status up to the first event, one
//!    interval per consecutive event pair, last status to the end of the day
//! 3. Fold [`ComplianceState`] over the intervals, attributing each interval's
//!    hours to the status it was spent in
//!
//! Evaluation is a pure whole-log recomputation. Nothing is retained between
//! calls.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ComplianceConfig;
use crate::log::DutyStatusLog;
use crate::result::{ComplianceResult, Segment, StatusTotals};
use crate::status::DutyStatus;

/// Maximum driving hours before a qualifying reset.
pub const DRIVING_LIMIT_HOURS: f64 = 11.0;
/// Maximum on-duty window before a qualifying reset.
pub const DUTY_WINDOW_HOURS: f64 = 14.0;
/// Driving allowed since the last break.
pub const DRIVING_BEFORE_BREAK_HOURS: f64 = 8.0;
/// Non-driving time that counts as a break.
pub const BREAK_HOURS: f64 = 0.5;
/// Consecutive rest that resets the driving and duty clocks.
pub const RESET_HOURS: f64 = 10.0;
/// Sleeper-berth period required for the split provision.
pub const SLEEPER_SPLIT_HOURS: f64 = 7.0;
/// Shorter rest period of the split provision.
pub const SHORT_REST_HOURS: f64 = 2.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Rule clocks carried across the intervals of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceState {
    /// Uninterrupted off-duty/sleeper-berth hours.
    pub ten_hour_consecutive: f64,
    /// Driving hours since the last 30-minute break.
    pub driving_consecutive: f64,
    /// Sleeper-berth hours toward the split provision.
    pub sleeper_consecutive: f64,
    /// Driving hours since the last reset.
    pub eleven_hour_driving: f64,
    /// On-duty window hours since the last reset.
    pub fourteen_hour_limit: f64,
    /// Non-driving hours since driving last began.
    pub driving_break: f64,
    /// A sleeper-berth period long enough for the split provision was taken.
    pub seven_hour_provision_met: bool,
}

impl ComplianceState {
    /// Seeds the clocks from the carried-over start conditions.
    pub fn new(config: &ComplianceConfig) -> Self {
        Self {
            ten_hour_consecutive: config.start_off_duty_hours,
            eleven_hour_driving: config.start_driving_hours,
            fourteen_hour_limit: config.start_duty_hours,
            ..Self::default()
        }
    }

    /// Applies `hours` spent in `prev` followed by a change to `curr`.
    ///
    /// Steps run in a fixed order; later steps read clocks set by earlier
    /// ones.
    #[must_use]
    pub fn advance(mut self, prev: DutyStatus, curr: DutyStatus, hours: f64) -> Self {
        if prev.is_rest() {
            if prev == DutyStatus::SleeperBerth && !self.seven_hour_provision_met {
                self.sleeper_consecutive += hours;
                if self.sleeper_consecutive > SLEEPER_SPLIT_HOURS {
                    self.seven_hour_provision_met = true;
                }
            }

            self.ten_hour_consecutive += hours;

            if self.rest_qualifies_for_reset() {
                self.eleven_hour_driving = 0.0;
                self.fourteen_hour_limit = 0.0;

                if self.ten_hour_consecutive < SLEEPER_SPLIT_HOURS {
                    self.sleeper_consecutive = 0.0;
                    self.seven_hour_provision_met = false;
                }
            }
        } else {
            self.fourteen_hour_limit += hours;

            if prev == DutyStatus::Driving {
                self.eleven_hour_driving += hours;
                self.driving_consecutive += hours;
            }
        }

        if prev != DutyStatus::Driving {
            self.driving_break += hours;
            if self.driving_break >= BREAK_HOURS {
                self.driving_consecutive = 0.0;
            }
        }

        // Unmet sleeper credit does not survive a change to anything but driving.
        if curr != DutyStatus::Driving && !self.seven_hour_provision_met {
            self.sleeper_consecutive = 0.0;
        }

        if curr.is_on_duty() {
            self.ten_hour_consecutive = 0.0;
            if curr == DutyStatus::Driving {
                self.driving_break = 0.0;
            }
        }

        self
    }

    /// Full 10-hour reset, or the split provision: a 7-hour sleeper-berth
    /// period paired with a separate rest of at least 2 hours.
    fn rest_qualifies_for_reset(&self) -> bool {
        let rest = self.ten_hour_consecutive;
        rest >= RESET_HOURS
            || ((SHORT_REST_HOURS..SLEEPER_SPLIT_HOURS).contains(&rest)
                && self.sleeper_consecutive >= SLEEPER_SPLIT_HOURS
                && rest + self.sleeper_consecutive >= RESET_HOURS)
    }

    /// Driving-violation predicate after a change to `curr`.
    ///
    /// The 14-hour window only counts as violated while driving.
    pub fn violation(&self, curr: DutyStatus) -> bool {
        self.eleven_hour_driving > DRIVING_LIMIT_HOURS
            || self.driving_consecutive > DRIVING_BEFORE_BREAK_HOURS
            || (self.fourteen_hour_limit > DUTY_WINDOW_HOURS && curr == DutyStatus::Driving)
    }
}

/// A stretch of time spent in `prev`, ending with a change to `curr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    prev: DutyStatus,
    curr: DutyStatus,
    from: DateTime<FixedOffset>,
    to: DateTime<FixedOffset>,
}

/// Absolute distance between two instants in fractional hours.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn hours_between(a: DateTime<FixedOffset>, b: DateTime<FixedOffset>) -> f64 {
    (b - a).num_milliseconds().abs() as f64 / MS_PER_HOUR
}

/// Midnight of `ts`'s calendar date, in `ts`'s own offset.
fn midnight_of(ts: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    ts.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(*ts.offset()).single())
        .unwrap_or(ts)
}

/// Resolves `[day_start, day_end)`.
fn day_bounds(
    log: &DutyStatusLog,
    config: &ComplianceConfig,
    now: DateTime<Utc>,
) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
    let day_start = config
        .start_date
        .or_else(|| log.first().map(|event| midnight_of(event.timestamp())))
        .unwrap_or_else(|| midnight_of(now.fixed_offset()));
    (day_start, day_start + Duration::hours(24))
}

fn intervals(
    log: &DutyStatusLog,
    start_status: DutyStatus,
    day_start: DateTime<FixedOffset>,
    day_end: DateTime<FixedOffset>,
) -> Vec<Interval> {
    let events = log.events();
    let (Some(first), Some(last)) = (events.first(), events.last()) else {
        return vec![Interval {
            prev: start_status,
            curr: start_status,
            from: day_start,
            to: day_end,
        }];
    };

    let mut intervals = Vec::with_capacity(events.len() + 1);
    intervals.push(Interval {
        prev: start_status,
        curr: first.status(),
        from: day_start,
        to: first.timestamp(),
    });
    intervals.extend(events.windows(2).map(|pair| Interval {
        prev: pair[0].status(),
        curr: pair[1].status(),
        from: pair[0].timestamp(),
        to: pair[1].timestamp(),
    }));
    intervals.push(Interval {
        prev: last.status(),
        curr: last.status(),
        from: last.timestamp(),
        to: day_end,
    });
    intervals
}

/// Evaluates the log against the Hours-of-Service rules.
///
/// The system clock is only consulted when the log is empty and the config
/// names no start date; see [`evaluate_at`].
pub fn evaluate(log: &DutyStatusLog, config: &ComplianceConfig) -> ComplianceResult {
    evaluate_at(log, config, Utc::now())
}

/// Evaluates the log, using `now` to pick the day when nothing else does.
///
/// Never fails: an empty log yields one segment spanning the whole day in the
/// start status.
pub fn evaluate_at(
    log: &DutyStatusLog,
    config: &ComplianceConfig,
    now: DateTime<Utc>,
) -> ComplianceResult {
    let (day_start, day_end) = day_bounds(log, config, now);
    let intervals = intervals(log, config.start_status, day_start, day_end);

    let mut state = ComplianceState::new(config);
    let mut totals_by_status = StatusTotals::default();
    let mut segments = Vec::with_capacity(intervals.len());

    for interval in intervals {
        let hours = hours_between(interval.from, interval.to);
        state = state.advance(interval.prev, interval.curr, hours);
        let violation = state.violation(interval.curr);
        totals_by_status.add(interval.prev, hours);

        tracing::trace!(
            prev = %interval.prev,
            curr = %interval.curr,
            hours,
            violation,
            ?state,
            "applied interval"
        );

        segments.push(Segment {
            status: interval.prev,
            start_time: interval.from,
            end_time: interval.to,
            violation,
            state,
        });
    }

    let driving_violation = segments.last().is_some_and(|segment| segment.violation);
    tracing::debug!(
        events = log.len(),
        segments = segments.len(),
        driving_violation,
        "evaluated duty status log"
    );

    ComplianceResult {
        day_start,
        day_end,
        totals_by_status,
        driving_violation,
        segments,
    }
}
