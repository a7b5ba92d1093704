//! Serializable mapping from dates to their event lists.
//!
//! # Responsibility
//! - Hold the date-keyed event lists as a plain value type.
//! - Define the persisted JSON shape: `{"yyyy-MM-dd": ["event", ...]}`.
//!
//! # Invariants
//! - List order is insertion order and is display order.
//! - An absent key and a present empty list are distinct states.
//! - Removing the last event of a date removes its entry.

use crate::model::date_key::DateKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema version of the persisted event blob.
///
/// Stored beside the blob in the slot record, the blob itself stays a bare
/// JSON object.
pub const EVENT_BOOK_SCHEMA_VERSION: u32 = 1;

/// Date-keyed event lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventBook {
    entries: BTreeMap<DateKey, Vec<String>>,
}

impl EventBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns events for `key`, or an empty slice when no entry exists.
    pub fn events_for(&self, key: &DateKey) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether an entry (possibly empty) exists for `key`.
    pub fn contains_entry(&self, key: &DateKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether `key` has at least one event.
    pub fn has_events(&self, key: &DateKey) -> bool {
        self.entries.get(key).is_some_and(|events| !events.is_empty())
    }

    /// Appends `text` to the list for `key`, creating the entry if absent.
    pub fn append(&mut self, key: DateKey, text: String) {
        self.entries.entry(key).or_default().push(text);
    }

    /// Removes the event at `index` and returns it.
    ///
    /// Returns `None` without touching the book when `key` has no entry or
    /// `index` is out of bounds. The entry is dropped once its list is empty.
    pub fn remove_at(&mut self, key: &DateKey, index: usize) -> Option<String> {
        let events = self.entries.get_mut(key)?;
        if index >= events.len() {
            return None;
        }
        let removed = events.remove(index);
        if events.is_empty() {
            self.entries.remove(key);
        }
        Some(removed)
    }

    /// Day numbers within `(year, month)` that carry at least one event.
    pub fn marked_days(&self, year: i32, month: u32) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|(key, events)| {
                key.year() == year && key.month() == month && !events.is_empty()
            })
            .map(|(key, _)| key.day())
            .collect()
    }

    /// Number of dates with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of events across all dates.
    pub fn event_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodes a stored blob.
    ///
    /// Every key must be a canonical `yyyy-MM-dd` date. A single other key
    /// rejects the whole blob rather than dropping that entry.
    pub fn from_json(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }
}
