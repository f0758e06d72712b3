//! Raw log input as it arrives from callers.
//!
//! Every accepted input shape is an explicit variant. Anything outside those
//! shapes lands in an `Other`/`Malformed` variant instead of failing the whole
//! document, so one corrupt element never prevents the rest of the day from
//! being evaluated.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::status::DutyStatus;
use crate::types::ValidationError;

/// Offset-carrying layouts RFC 3339 parsing misses: minute precision,
/// `+0000`-style offsets and a space separator. `%#z` also takes `Z`.
const OFFSET_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Naive date-time layouts accepted in addition to RFC 3339.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A status code as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawStatus {
    /// A numeric code, e.g. `3`.
    Number(f64),
    /// A code or label in string form, e.g. `"3"` or `"D"`.
    Text(String),
    /// Anything else (always invalid).
    Other(serde_json::Value),
}

impl RawStatus {
    /// Resolves the raw value to one of the four duty statuses.
    pub fn resolve(&self) -> Result<DutyStatus, ValidationError> {
        match self {
            Self::Number(n) => {
                DutyStatus::from_number(*n).ok_or_else(|| ValidationError::InvalidStatus {
                    value: n.to_string(),
                })
            }
            Self::Text(s) => s.parse(),
            Self::Other(value) => Err(ValidationError::InvalidStatus {
                value: value.to_string(),
            }),
        }
    }
}

impl From<DutyStatus> for RawStatus {
    fn from(status: DutyStatus) -> Self {
        Self::Number(f64::from(status.code()))
    }
}

/// A timestamp as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    /// Milliseconds since the Unix epoch (UTC).
    Millis(i64),
    /// Fractional epoch milliseconds; truncated toward zero.
    FractionalMillis(f64),
    /// A date-time string.
    Text(String),
    /// Anything else (always invalid).
    Other(serde_json::Value),
}

impl RawTimestamp {
    /// Parses the raw value into an offset-aware instant.
    pub fn resolve(&self) -> Result<DateTime<FixedOffset>, ValidationError> {
        match self {
            Self::Millis(ms) => from_epoch_millis(*ms),
            Self::FractionalMillis(ms) if ms.is_finite() => {
                #[allow(clippy::cast_possible_truncation)]
                let whole = ms.trunc() as i64;
                from_epoch_millis(whole)
            }
            Self::FractionalMillis(ms) => Err(ValidationError::InvalidTimestamp {
                value: ms.to_string(),
            }),
            Self::Text(s) => parse_timestamp(s),
            Self::Other(value) => Err(ValidationError::InvalidTimestamp {
                value: value.to_string(),
            }),
        }
    }
}

fn from_epoch_millis(ms: i64) -> Result<DateTime<FixedOffset>, ValidationError> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            value: ms.to_string(),
        })
}

impl From<DateTime<FixedOffset>> for RawTimestamp {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Text(dt.to_rfc3339())
    }
}

/// Parses a date-time string.
///
/// Supports:
/// - RFC 3339: "2024-03-05T08:00:00-06:00", "2024-03-05T14:00:00Z"
/// - Other offset forms: "2024-03-05T08:00Z", "2024-03-05T08:00:00+0000"
/// - Naive date-time: "2024-03-05T08:00", "2024-03-05 08:00:00"
/// - Date only: "2024-03-05" (midnight)
///
/// Naive forms carry no offset and are taken as UTC.
pub fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, ValidationError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| ValidationError::InvalidTimestamp {
            value: s.to_string(),
        })
}

/// A carry-over hour counter as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawNumber {
    /// Hours value, or 0 when unparseable, negative or not finite.
    pub fn hours(&self) -> f64 {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Self::Other(_) => 0.0,
        };
        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// One event entry: `{ "status": 3, "d": "2024-03-05T08:00:00Z" }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RawStatus>,
    #[serde(default, alias = "timestamp", skip_serializing_if = "Option::is_none")]
    pub d: Option<RawTimestamp>,
}

impl RawEvent {
    /// Builds a raw event from any status/timestamp representation.
    pub fn new(status: impl Into<RawStatus>, d: impl Into<RawTimestamp>) -> Self {
        Self {
            status: Some(status.into()),
            d: Some(d.into()),
        }
    }
}

/// An element of the `data` array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawEntry {
    /// A JSON object, whatever its fields hold.
    Event(RawEvent),
    /// A non-object element; dropped during validation.
    Malformed(serde_json::Value),
}

// Derived struct deserialization would also accept a positional array like
// `[3, "2024-03-05T08:00:00Z"]`, so only objects become events.
impl<'de> Deserialize<'de> for RawEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(Self::Malformed(value));
        }
        match RawEvent::deserialize(&value) {
            Ok(event) => Ok(Self::Event(event)),
            Err(_) => Ok(Self::Malformed(value)),
        }
    }
}

impl From<RawEvent> for RawEntry {
    fn from(event: RawEvent) -> Self {
        Self::Event(event)
    }
}

/// Start-of-day options: `{ "startStatus": 2, "startDrivingHours": 3.5, ... }`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_status: Option<RawStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_off_duty_hours: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_driving_hours: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_duty_hours: Option<RawNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<RawTimestamp>,
}

/// A whole log document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogDocument {
    /// A bare array of events.
    Events(Vec<RawEntry>),
    /// `{ "data": [...], "options": {...} }`.
    Full {
        #[serde(default)]
        data: Vec<RawEntry>,
        #[serde(default)]
        options: RawOptions,
    },
}

impl LogDocument {
    /// Splits the document into its event entries and options.
    pub fn into_parts(self) -> (Vec<RawEntry>, RawOptions) {
        match self {
            Self::Events(data) => (data, RawOptions::default()),
            Self::Full { data, options } => (data, options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    #[test]
    fn parses_rfc3339_keeping_offset() {
        let dt = parse_timestamp("2024-03-05T08:15:00-06:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -6 * 3600);
        assert_eq!(dt.hour(), 8);
        assert_eq!(dt.with_timezone(&Utc).hour(), 14);
    }

    #[test]
    fn parses_offset_forms_outside_rfc3339() {
        let expected = parse_timestamp("2024-03-05T08:00:00Z").unwrap();
        for s in [
            "2024-03-05T08:00Z",
            "2024-03-05T08:00:00+0000",
            "2024-03-05T08:00:00.000Z",
            "2024-03-05 08:00+00:00",
        ] {
            assert_eq!(parse_timestamp(s), Ok(expected), "failed to parse {s}");
        }

        let dt = parse_timestamp("2024-03-05T08:00-06:00").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -6 * 3600);
        assert_eq!(dt.with_timezone(&Utc).hour(), 14);
    }

    #[test]
    fn parses_naive_forms_as_utc() {
        let a = parse_timestamp("2024-03-05T08:15").unwrap();
        let b = parse_timestamp("2024-03-05 08:15:00").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.offset().local_minus_utc(), 0);

        let midnight = parse_timestamp("2024-03-05").unwrap();
        assert_eq!(midnight.hour(), 0);
    }

    #[test]
    fn rejects_garbage_timestamps() {
        assert!(parse_timestamp("not a date").is_err());
        assert!(parse_timestamp("2024-13-40").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn resolves_status_shapes() {
        assert_eq!(RawStatus::Number(3.0).resolve(), Ok(DutyStatus::Driving));
        assert_eq!(
            RawStatus::Text("SB".into()).resolve(),
            Ok(DutyStatus::SleeperBerth)
        );
        assert!(RawStatus::Number(2.5).resolve().is_err());
        assert!(RawStatus::Number(0.0).resolve().is_err());
        assert!(RawStatus::Other(serde_json::Value::Bool(true)).resolve().is_err());
    }

    #[test]
    fn epoch_millis_timestamp() {
        let ts = RawTimestamp::Millis(1_709_625_600_000).resolve().unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-05T08:00:00+00:00");
    }

    #[test]
    fn fractional_epoch_millis_truncate() {
        let raw: RawTimestamp = serde_json::from_str("1709625600000.9").unwrap();
        assert_eq!(raw, RawTimestamp::FractionalMillis(1_709_625_600_000.9));
        let ts = raw.resolve().unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-03-05T08:00:00+00:00");

        let whole: RawTimestamp = serde_json::from_str("1709625600000").unwrap();
        assert_eq!(whole, RawTimestamp::Millis(1_709_625_600_000));
        assert!(RawTimestamp::FractionalMillis(f64::NAN).resolve().is_err());
    }

    #[test]
    fn hours_default_to_zero() {
        assert!((RawNumber::Text(" 3.5 ".into()).hours() - 3.5).abs() < f64::EPSILON);
        assert!(RawNumber::Text("abc".into()).hours().abs() < f64::EPSILON);
        assert!(RawNumber::Number(-2.0).hours().abs() < f64::EPSILON);
        assert!(RawNumber::Other(serde_json::Value::Null).hours().abs() < f64::EPSILON);
    }

    #[test]
    fn document_tolerates_bad_elements() {
        let json = r#"{
            "data": [
                {"status": 3, "d": "2024-03-05T08:00:00Z"},
                "garbage",
                {"status": [1], "d": {"when": "soon"}},
                {"d": "2024-03-05T09:00:00Z"}
            ],
            "options": {"startStatus": "x", "startDrivingHours": "2"}
        }"#;
        let doc: LogDocument = serde_json::from_str(json).unwrap();
        let (data, options) = doc.into_parts();

        assert_eq!(data.len(), 4);
        assert!(matches!(data[1], RawEntry::Malformed(_)));
        assert!(matches!(
            &data[2],
            RawEntry::Event(RawEvent {
                status: Some(RawStatus::Other(_)),
                d: Some(RawTimestamp::Other(_)),
            })
        ));
        assert!(matches!(&data[3], RawEntry::Event(RawEvent { status: None, .. })));
        assert_eq!(options.start_driving_hours, Some(RawNumber::Text("2".into())));
    }

    #[test]
    fn positional_array_entry_is_malformed() {
        let json = r#"[
            [3, "2024-03-05T08:00:00Z"],
            {"status": 1, "d": "2024-03-05T09:00:00Z"}
        ]"#;
        let doc: LogDocument = serde_json::from_str(json).unwrap();
        let (data, _) = doc.into_parts();

        assert_eq!(data.len(), 2);
        assert!(matches!(&data[0], RawEntry::Malformed(serde_json::Value::Array(_))));
        assert!(matches!(
            &data[1],
            RawEntry::Event(RawEvent {
                status: Some(RawStatus::Number(_)),
                d: Some(RawTimestamp::Text(_)),
            })
        ));
    }

    #[test]
    fn document_accepts_bare_array() {
        let json = r#"[{"status": "1", "timestamp": "2024-03-05T00:30:00Z"}]"#;
        let doc: LogDocument = serde_json::from_str(json).unwrap();
        let (data, options) = doc.into_parts();

        assert_eq!(data.len(), 1);
        assert_eq!(options, RawOptions::default());
    }
}
