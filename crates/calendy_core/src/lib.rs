//! Core logic for the Calendy month view.
//! This crate owns calendar arithmetic and date-keyed event persistence;
//! presentation lives in the UI layer that calls in through `calendy_ffi`.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calendar::grid::{days_in_month, CalendarDay, CalendarGrid, GridError, GridResult};
pub use calendar::navigation::{month_title, next_month, previous_month};
pub use config::{parse_week_start, CalendarConfig, DEFAULT_EVENTS_SLOT};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::date_key::{DateKey, DateKeyError};
pub use model::event_book::{EventBook, EVENT_BOOK_SCHEMA_VERSION};
pub use repo::slot_repo::{
    RepoError, RepoResult, SlotRecord, SlotRepository, SqliteSlotRepository,
};
pub use service::calendar_session::CalendarSession;
pub use service::event_store::{EventStore, LoadOutcome, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
