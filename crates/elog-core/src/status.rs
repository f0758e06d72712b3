//! Duty status enum as the single source of truth for status codes and labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::ValidationError;

/// The four duty statuses recorded on a driver's daily log.
///
/// Codes are fixed: `1` Off-Duty, `2` Sleeper Berth, `3` Driving,
/// `4` On-Duty (not driving).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum DutyStatus {
    #[default]
    OffDuty,
    SleeperBerth,
    Driving,
    OnDuty,
}

impl DutyStatus {
    /// All statuses in code order.
    pub const ALL: [Self; 4] = [Self::OffDuty, Self::SleeperBerth, Self::Driving, Self::OnDuty];

    /// Returns the numeric status code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::OffDuty => 1,
            Self::SleeperBerth => 2,
            Self::Driving => 3,
            Self::OnDuty => 4,
        }
    }

    /// Looks up a status by its numeric code.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::OffDuty),
            2 => Some(Self::SleeperBerth),
            3 => Some(Self::Driving),
            4 => Some(Self::OnDuty),
            _ => None,
        }
    }

    /// Looks up a status by a numeric code that may arrive as a float.
    ///
    /// `3.0` is code 3; fractional or out-of-range values match nothing.
    #[must_use]
    pub fn from_number(n: f64) -> Option<Self> {
        if (1.0..=4.0).contains(&n) && n.fract() == 0.0 {
            #[allow(clippy::cast_possible_truncation)]
            let code = n as i64;
            Self::from_code(code)
        } else {
            None
        }
    }

    /// Short label printed on the log grid.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OffDuty => "OFF",
            Self::SleeperBerth => "SB",
            Self::Driving => "D",
            Self::OnDuty => "ON",
        }
    }

    /// Off-duty and sleeper-berth time both count toward rest.
    #[must_use]
    pub const fn is_rest(self) -> bool {
        matches!(self, Self::OffDuty | Self::SleeperBerth)
    }

    /// Driving and on-duty time both count toward the 14-hour window.
    #[must_use]
    pub const fn is_on_duty(self) -> bool {
        matches!(self, Self::Driving | Self::OnDuty)
    }
}

impl fmt::Display for DutyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<i64> for DutyStatus {
    type Error = ValidationError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| ValidationError::InvalidStatus {
            value: code.to_string(),
        })
    }
}

impl FromStr for DutyStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let status = match trimmed.parse::<f64>() {
            Ok(n) => Self::from_number(n),
            Err(_) => Self::ALL
                .into_iter()
                .find(|status| status.label().eq_ignore_ascii_case(trimmed)),
        };
        status.ok_or_else(|| ValidationError::InvalidStatus {
            value: trimmed.to_string(),
        })
    }
}

impl Serialize for DutyStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for DutyStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = i64::deserialize(deserializer)?;
        Self::try_from(code).map_err(serde::de::Error::custom)
    }
}
