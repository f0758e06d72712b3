//! The day's ordered, validated list of duty-status changes.

use crate::event::DutyStatusEvent;
use crate::input::{RawEntry, RawEvent};

/// Validated duty-status events in ascending timestamp order.
///
/// Only `load`, `append` and `clear` change the contents. Every mutation runs
/// the same validate-and-sort pass, so the list never holds a malformed event
/// and events sharing a timestamp keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DutyStatusLog {
    events: Vec<DutyStatusEvent>,
}

impl DutyStatusLog {
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Builds a log from raw entries, dropping the malformed ones.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<RawEntry>,
    {
        let mut log = Self::new();
        log.load(entries);
        log
    }

    /// Replaces the contents with the valid subset of `entries`, sorted.
    ///
    /// Never fails: malformed entries are logged and skipped.
    pub fn load<I>(&mut self, entries: I) -> &[DutyStatusEvent]
    where
        I: IntoIterator,
        I::Item: Into<RawEntry>,
    {
        let mut dropped = 0_usize;
        self.events = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match validate_entry(index, &entry.into()) {
                Some(event) => Some(event),
                None => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        self.normalize();

        tracing::debug!(kept = self.events.len(), dropped, "loaded duty status log");
        &self.events
    }

    /// Adds one raw event, then re-normalizes the whole log.
    ///
    /// Returns `false` if the event was malformed and therefore dropped.
    pub fn append(&mut self, raw: &RawEvent) -> bool {
        match DutyStatusEvent::try_from(raw) {
            Ok(event) => {
                self.append_event(event);
                true
            }
            Err(err) => {
                tracing::debug!(%err, "dropping appended duty status event");
                false
            }
        }
    }

    /// Adds one validated event, then re-normalizes the whole log.
    pub fn append_event(&mut self, event: DutyStatusEvent) {
        self.events.push(event);
        self.normalize();
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn events(&self) -> &[DutyStatusEvent] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DutyStatusEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn first(&self) -> Option<&DutyStatusEvent> {
        self.events.first()
    }

    /// Stable sort by instant; ties keep insertion order.
    fn normalize(&mut self) {
        self.events.sort_by_key(DutyStatusEvent::timestamp);
    }
}

impl<'a> IntoIterator for &'a DutyStatusLog {
    type Item = &'a DutyStatusEvent;
    type IntoIter = std::slice::Iter<'a, DutyStatusEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_entry(index: usize, entry: &RawEntry) -> Option<DutyStatusEvent> {
    match entry {
        RawEntry::Event(raw) => DutyStatusEvent::try_from(raw)
            .inspect_err(|err| tracing::debug!(index, %err, "dropping duty status event"))
            .ok(),
        RawEntry::Malformed(value) => {
            tracing::debug!(index, %value, "dropping non-object duty status entry");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{RawStatus, RawTimestamp};
    use crate::status::DutyStatus;

    fn raw(status: f64, d: &str) -> RawEvent {
        RawEvent::new(RawStatus::Number(status), RawTimestamp::Text(d.to_string()))
    }

    fn statuses(log: &DutyStatusLog) -> Vec<u8> {
        log.iter().map(|e| e.status().code()).collect()
    }

    #[test]
    fn load_keeps_valid_subset_sorted() {
        let mut log = DutyStatusLog::new();
        log.load([
            raw(3.0, "2024-03-05T10:00:00Z"),
            raw(9.0, "2024-03-05T05:00:00Z"),
            raw(1.0, "2024-03-05T08:00:00Z"),
            raw(4.0, "not a time"),
            raw(2.0, "2024-03-05T02:00:00Z"),
        ]);

        assert_eq!(statuses(&log), vec![2, 1, 3]);
        let times: Vec<_> = log.iter().map(DutyStatusEvent::timestamp).collect();
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn load_preserves_insertion_order_on_ties() {
        let log = DutyStatusLog::from_entries([
            raw(4.0, "2024-03-05T09:00:00Z"),
            raw(3.0, "2024-03-05T07:00:00Z"),
            raw(1.0, "2024-03-05T07:00:00Z"),
            raw(2.0, "2024-03-05T07:00:00Z"),
        ]);

        assert_eq!(statuses(&log), vec![3, 1, 2, 4]);
    }

    #[test]
    fn load_orders_by_instant_across_offsets() {
        // 06:00-05:00 is 11:00Z, later than 10:00Z
        let log = DutyStatusLog::from_entries([
            raw(3.0, "2024-03-05T06:00:00-05:00"),
            raw(4.0, "2024-03-05T10:00:00Z"),
        ]);

        assert_eq!(statuses(&log), vec![4, 3]);
    }

    #[test]
    fn load_replaces_previous_contents() {
        let mut log = DutyStatusLog::from_entries([raw(3.0, "2024-03-05T10:00:00Z")]);
        log.load([raw(2.0, "2024-03-05T01:00:00Z"), raw(1.0, "2024-03-05T03:00:00Z")]);
        assert_eq!(statuses(&log), vec![2, 1]);
    }

    #[test]
    fn load_drops_malformed_entries() {
        let log = DutyStatusLog::from_entries([
            RawEntry::Malformed(serde_json::json!("junk")),
            RawEntry::Event(RawEvent::default()),
            RawEntry::Event(raw(1.0, "2024-03-05T03:00:00Z")),
        ]);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn load_drops_positional_array_entries() {
        let entries: Vec<RawEntry> = serde_json::from_str(
            r#"[[3, "2024-03-05T08:00:00Z"], {"status": 1, "d": "2024-03-05T09:00:00Z"}]"#,
        )
        .unwrap();
        let log = DutyStatusLog::from_entries(entries);

        assert_eq!(statuses(&log), vec![1]);
    }

    #[test]
    fn load_of_nothing_valid_is_empty() {
        let log = DutyStatusLog::from_entries([raw(0.0, "2024-03-05T03:00:00Z"), raw(5.0, "")]);
        assert!(log.is_empty());
    }

    #[test]
    fn append_resorts_whole_log() {
        let mut log = DutyStatusLog::from_entries([
            raw(3.0, "2024-03-05T08:00:00Z"),
            raw(1.0, "2024-03-05T12:00:00Z"),
        ]);

        assert!(log.append(&raw(4.0, "2024-03-05T10:00:00Z")));
        assert!(log.append(&raw(2.0, "2024-03-05T01:00:00Z")));
        assert_eq!(statuses(&log), vec![2, 3, 4, 1]);
    }

    #[test]
    fn append_rejects_malformed_event() {
        let mut log = DutyStatusLog::from_entries([raw(3.0, "2024-03-05T08:00:00Z")]);

        assert!(!log.append(&raw(7.0, "2024-03-05T09:00:00Z")));
        assert!(!log.append(&raw(1.0, "whenever")));
        assert_eq!(log.len(), 1);
        assert_eq!(log.first().map(DutyStatusEvent::status), Some(DutyStatus::Driving));
    }

    #[test]
    fn append_after_tie_goes_last() {
        let mut log = DutyStatusLog::from_entries([raw(3.0, "2024-03-05T08:00:00Z")]);
        log.append(&raw(1.0, "2024-03-05T08:00:00Z"));
        assert_eq!(statuses(&log), vec![3, 1]);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = DutyStatusLog::from_entries([raw(3.0, "2024-03-05T08:00:00Z")]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log, DutyStatusLog::default());
    }
}
