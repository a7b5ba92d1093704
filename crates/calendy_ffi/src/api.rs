//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose month-view and event operations to Dart via FRB.
//! - Flatten core errors into plain values; storage problems never reach the UI.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Each call opens the database, runs one use-case and closes it again;
//!   mutations run inside one immediate transaction.

use calendy_core::db::open_db;
use calendy_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    month_title, next_month as next_month_inner, parse_week_start, ping as ping_inner,
    previous_month as previous_month_inner, CalendarConfig, CalendarDay, CalendarGrid,
    CalendarSession, DateKey, EventStore, SlotRepository, SqliteSlotRepository, StoreError,
};
use chrono::{Datelike, NaiveDate};
use log::warn;
use rusqlite::{Connection, TransactionBehavior};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "calendy.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static CONFIG: OnceLock<CalendarConfig> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Plain calendar date exchanged with the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    fn from_naive(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// Everything the month screen renders for one reference date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    /// Heading such as `March 2025`.
    pub title: String,
    /// Single-letter weekday headers in column order.
    pub weekday_headers: Vec<String>,
    /// Grid cells; `0` marks a leading blank.
    pub days: Vec<u32>,
    /// Day numbers drawn with an event marker.
    pub marked_days: Vec<u32>,
    /// Day number drawn with the current-day highlight.
    pub highlighted_day: u32,
}

/// Result envelope for event mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventActionResponse {
    /// Whether the mutation was applied.
    pub ok: bool,
    /// Events of the date after the call, in display order.
    pub events: Vec<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl EventActionResponse {
    fn applied(message: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            ok: true,
            events,
            message: message.into(),
        }
    }

    fn skipped(message: impl Into<String>, events: Vec<String>) -> Self {
        Self {
            ok: false,
            events,
            message: message.into(),
        }
    }
}

/// Grid cells for `(year, month)`; `0` marks a leading blank.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Returns an empty list for an invalid month.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_generate_days(year: i32, month: u32) -> Vec<u32> {
    match active_grid().generate_days(year, month) {
        Ok(days) => cell_values(days),
        Err(err) => {
            warn!("event=grid_generate module=ffi status=error error={err}");
            Vec::new()
        }
    }
}

/// Shifts `date` back one month, clamping the day to the month length.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Invalid input dates are returned unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_previous_month(date: CalendarDate) -> CalendarDate {
    match date.to_naive() {
        Some(naive) => CalendarDate::from_naive(previous_month_inner(naive)),
        None => date,
    }
}

/// Shifts `date` forward one month, clamping the day to the month length.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Invalid input dates are returned unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_next_month(date: CalendarDate) -> CalendarDate {
    match date.to_naive() {
        Some(naive) => CalendarDate::from_naive(next_month_inner(naive)),
        None => date,
    }
}

/// Date key (`yyyy-MM-dd`) for `day` in the month of `reference`.
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Returns an empty string when the day does not exist in that month.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_date_key(reference: CalendarDate, day: u32) -> String {
    let Some(reference) = NaiveDate::from_ymd_opt(reference.year, reference.month, 1) else {
        return String::new();
    };
    DateKey::for_day(reference, day)
        .map(|key| key.to_string())
        .unwrap_or_default()
}

/// Builds the month screen model for `reference`.
///
/// # FFI contract
/// - Sync call, DB-backed read.
/// - An invalid `reference` yields an empty view.
/// - Storage failures yield a view without markers.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month_view(reference: CalendarDate) -> MonthView {
    let Some(reference) = reference.to_naive() else {
        return MonthView {
            title: String::new(),
            weekday_headers: header_strings(&active_grid()),
            days: Vec::new(),
            marked_days: Vec::new(),
            highlighted_day: 0,
        };
    };

    match open_connection() {
        Some(conn) => {
            let session = CalendarSession::start(
                SqliteSlotRepository::new(&conn),
                active_config(),
                reference,
            );
            month_view_of(&session)
        }
        None => {
            let grid = active_grid();
            MonthView {
                title: month_title(reference),
                weekday_headers: header_strings(&grid),
                days: grid
                    .generate_days(reference.year(), reference.month())
                    .map(cell_values)
                    .unwrap_or_default(),
                marked_days: Vec::new(),
                highlighted_day: reference.day(),
            }
        }
    }
}

/// Events stored for `date_key`, in display order.
///
/// # FFI contract
/// - Sync call, DB-backed read.
/// - Returns an empty list for unknown or malformed keys and on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn events_for(date_key: String) -> Vec<String> {
    let Ok(key) = DateKey::parse(date_key.trim()) else {
        return Vec::new();
    };
    read_store(|store| store.events_for(&key).to_vec()).unwrap_or_default()
}

/// Whether `date_key` has at least one event.
///
/// # FFI contract
/// - Sync call, DB-backed read.
/// - Returns `false` for malformed keys and on storage failure.
#[flutter_rust_bridge::frb(sync)]
pub fn has_events(date_key: String) -> bool {
    let Ok(key) = DateKey::parse(date_key.trim()) else {
        return false;
    };
    read_store(|store| store.has_events(&key)).unwrap_or(false)
}

/// Appends `text` to the events of `date_key`.
///
/// # FFI contract
/// - Sync call, DB-backed read-modify-write.
/// - `text` is stored as given; only an empty string is rejected, without
///   touching storage.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn add_event(date_key: String, text: String) -> EventActionResponse {
    let key = match DateKey::parse(date_key.trim()) {
        Ok(key) => key,
        Err(err) => {
            return EventActionResponse::skipped(format!("add_event failed: {err}"), Vec::new())
        }
    };
    if text.is_empty() {
        return EventActionResponse::skipped("Event text is empty.", Vec::new());
    }

    match write_store(|store| {
        let added = store.add_event(&key, text);
        (added, store.events_for(&key).to_vec())
    }) {
        Ok((true, events)) => EventActionResponse::applied("Event added.", events),
        Ok((false, events)) => EventActionResponse::skipped("Event not added.", events),
        Err(err) => EventActionResponse::skipped(format!("add_event failed: {err}"), Vec::new()),
    }
}

/// Removes the event at `index` from `date_key`.
///
/// # FFI contract
/// - Sync call, DB-backed read-modify-write.
/// - Unknown dates and out-of-range indices are a no-op with `ok=false`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn delete_event(date_key: String, index: u32) -> EventActionResponse {
    let key = match DateKey::parse(date_key.trim()) {
        Ok(key) => key,
        Err(err) => {
            return EventActionResponse::skipped(format!("delete_event failed: {err}"), Vec::new())
        }
    };

    match write_store(|store| {
        let deleted = store.delete_event(&key, index as usize);
        (deleted, store.events_for(&key).to_vec())
    }) {
        Ok((true, events)) => EventActionResponse::applied("Event deleted.", events),
        Ok((false, events)) => EventActionResponse::skipped("No such event.", events),
        Err(err) => {
            EventActionResponse::skipped(format!("delete_event failed: {err}"), Vec::new())
        }
    }
}

fn month_view_of<R: SlotRepository>(session: &CalendarSession<R>) -> MonthView {
    MonthView {
        title: session.month_title(),
        weekday_headers: session
            .weekday_headers()
            .into_iter()
            .map(str::to_owned)
            .collect(),
        days: cell_values(session.days()),
        marked_days: session.marked_days(),
        highlighted_day: session.highlighted_day(),
    }
}

fn cell_values(days: Vec<CalendarDay>) -> Vec<u32> {
    days.into_iter().map(CalendarDay::cell_value).collect()
}

fn header_strings(grid: &CalendarGrid) -> Vec<String> {
    grid.weekday_headers()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("CALENDY_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn active_config() -> &'static CalendarConfig {
    CONFIG.get_or_init(|| {
        let mut config = CalendarConfig::default();
        if let Ok(raw) = std::env::var("CALENDY_WEEK_START") {
            match parse_week_start(&raw) {
                Ok(week_start) => config.week_start = week_start,
                Err(err) => warn!("event=config_load module=ffi status=error error={err}"),
            }
        }
        config
    })
}

fn active_grid() -> CalendarGrid {
    CalendarGrid::new(active_config().week_start)
}

fn open_connection() -> Option<Connection> {
    match open_db(resolve_db_path()) {
        Ok(conn) => Some(conn),
        Err(err) => {
            warn!("event=db_open module=ffi status=error error={err}");
            None
        }
    }
}

fn read_store<T>(f: impl FnOnce(&EventStore<SqliteSlotRepository<'_>>) -> T) -> Result<T, String> {
    let conn = open_db(resolve_db_path()).map_err(|err| format!("event DB open failed: {err}"))?;
    let mut store = EventStore::new(
        SqliteSlotRepository::new(&conn),
        active_config().events_slot.as_str(),
    );
    store.load();
    Ok(f(&store))
}

fn write_store<T>(
    f: impl FnOnce(&mut EventStore<SqliteSlotRepository<'_>>) -> T,
) -> Result<T, String> {
    let mut conn =
        open_db(resolve_db_path()).map_err(|err| format!("event DB open failed: {err}"))?;
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|err| format!("event DB lock failed: {err}"))?;

    let result = {
        let mut store = EventStore::new(
            SqliteSlotRepository::new(&tx),
            active_config().events_slot.as_str(),
        );
        match store.try_load() {
            Ok(_) => {}
            Err(err @ StoreError::UnsupportedSchemaVersion { .. }) => {
                warn!("event=events_load module=ffi status=rejected error={err}");
                return Err(format!("event store is read-only: {err}"));
            }
            Err(err) => warn!("event=events_load module=ffi status=error error={err}"),
        }
        f(&mut store)
    };

    tx.commit()
        .map_err(|err| format!("event DB commit failed: {err}"))?;
    Ok(result)
}
