//! Validated duty-status change events.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::input::RawEvent;
use crate::status::DutyStatus;
use crate::types::ValidationError;

/// A change of duty status at an instant.
///
/// Timestamps are parsed once at ingestion and keep the offset the input
/// encoded. Events are immutable once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyStatusEvent {
    status: DutyStatus,
    timestamp: DateTime<FixedOffset>,
}

impl DutyStatusEvent {
    pub const fn new(status: DutyStatus, timestamp: DateTime<FixedOffset>) -> Self {
        Self { status, timestamp }
    }

    /// The status the driver changed into.
    pub const fn status(&self) -> DutyStatus {
        self.status
    }

    /// When the change happened.
    pub const fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }
}

impl TryFrom<&RawEvent> for DutyStatusEvent {
    type Error = ValidationError;

    fn try_from(raw: &RawEvent) -> Result<Self, Self::Error> {
        let status = raw
            .status
            .as_ref()
            .ok_or(ValidationError::MissingField { field: "status" })?
            .resolve()?;
        let timestamp = raw
            .d
            .as_ref()
            .ok_or(ValidationError::MissingField { field: "d" })?
            .resolve()?;
        Ok(Self::new(status, timestamp))
    }
}
