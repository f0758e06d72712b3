//! Core domain logic for electronic driver logs.
//!
//! This crate contains the fundamental types and logic for:
//! - Duty-status events and the validated, time-ordered daily log
//! - Start-of-day conditions carried over from a prior day
//! - The Hours-of-Service rule engine: per-status totals and driving violations

mod config;
pub mod engine;
mod event;
pub mod input;
mod log;
mod result;
mod status;
mod types;

pub use config::ComplianceConfig;
pub use engine::{ComplianceState, evaluate, evaluate_at};
pub use event::DutyStatusEvent;
pub use input::{
    LogDocument, RawEntry, RawEvent, RawNumber, RawOptions, RawStatus, RawTimestamp,
    parse_timestamp,
};
pub use log::DutyStatusLog;
pub use result::{ComplianceResult, Segment, StatusTotals, format_hours};
pub use status::DutyStatus;
pub use types::ValidationError;
