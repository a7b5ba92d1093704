//! Calendar configuration.
//!
//! # Responsibility
//! - Carry the locale-dependent first day of week.
//! - Name the key-value slot that holds persisted events.

use chrono::Weekday;

/// Slot name used when no override is configured.
pub const DEFAULT_EVENTS_SLOT: &str = "savedEvents";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarConfig {
    /// Weekday shown in the first grid column.
    pub week_start: Weekday,
    /// Key-value slot holding the serialized events.
    pub events_slot: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Sun,
            events_slot: DEFAULT_EVENTS_SLOT.to_string(),
        }
    }
}

/// Parses a weekday name (`sunday`, `Mon`, ...) into a week start.
pub fn parse_week_start(value: &str) -> Result<Weekday, String> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| format!("unsupported week start `{}`; expected a weekday name", value.trim()))
}
