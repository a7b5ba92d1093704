//! Calendar session use-case service.
//!
//! # Responsibility
//! - Hold the state of one month-view session: displayed month, selected
//!   day and the event store.
//! - Expose the operations a presentation layer drives: navigation, day
//!   selection, adding and deleting events on the selected day.
//!
//! # Invariants
//! - Navigating to another month clears the selection.
//! - A selected day always exists in the displayed month.
//! - Empty input never reaches the store.

use crate::calendar::grid::{days_in_month, CalendarDay, CalendarGrid};
use crate::calendar::navigation::{month_title, next_month, previous_month};
use crate::config::CalendarConfig;
use crate::model::date_key::DateKey;
use crate::repo::slot_repo::SlotRepository;
use crate::service::event_store::EventStore;
use chrono::{Datelike, NaiveDate};
use log::{debug, warn};

/// Month-view session over an owned event store.
pub struct CalendarSession<R: SlotRepository> {
    store: EventStore<R>,
    grid: CalendarGrid,
    reference: NaiveDate,
    selected_day: Option<u32>,
}

impl<R: SlotRepository> CalendarSession<R> {
    /// Starts a session on the month of `today` and loads persisted events.
    pub fn start(repo: R, config: &CalendarConfig, today: NaiveDate) -> Self {
        let mut store = EventStore::new(repo, config.events_slot.as_str());
        store.load();
        Self::with_store(store, CalendarGrid::new(config.week_start), today)
    }

    /// Builds a session around an already prepared store.
    pub fn with_store(store: EventStore<R>, grid: CalendarGrid, reference: NaiveDate) -> Self {
        Self {
            store,
            grid,
            reference,
            selected_day: None,
        }
    }

    pub fn store(&self) -> &EventStore<R> {
        &self.store
    }

    /// Date whose month is displayed.
    pub fn reference_date(&self) -> NaiveDate {
        self.reference
    }

    pub fn selected_day(&self) -> Option<u32> {
        self.selected_day
    }

    pub fn show_previous_month(&mut self) {
        self.reference = previous_month(self.reference);
        self.selected_day = None;
    }

    pub fn show_next_month(&mut self) {
        self.reference = next_month(self.reference);
        self.selected_day = None;
    }

    /// Grid cells of the displayed month.
    pub fn days(&self) -> Vec<CalendarDay> {
        match self
            .grid
            .generate_days(self.reference.year(), self.reference.month())
        {
            Ok(days) => days,
            Err(err) => {
                warn!("event=grid_generate module=session status=error error={err}");
                Vec::new()
            }
        }
    }

    pub fn month_title(&self) -> String {
        month_title(self.reference)
    }

    pub fn weekday_headers(&self) -> Vec<&'static str> {
        self.grid.weekday_headers()
    }

    /// Day of month drawn with the "current day" highlight.
    pub fn highlighted_day(&self) -> u32 {
        self.reference.day()
    }

    /// Days of the displayed month that get an event marker.
    pub fn marked_days(&self) -> Vec<u32> {
        self.store.marked_days(self.reference.year(), self.reference.month())
    }

    /// Derives the date key of `day` in the displayed month.
    pub fn date_key_for_day(&self, day: u32) -> Option<DateKey> {
        DateKey::for_day(self.reference, day).ok()
    }

    /// Selects `day` of the displayed month.
    ///
    /// Returns `false` and keeps the previous selection when `day` is not in
    /// the month.
    pub fn select_day(&mut self, day: u32) -> bool {
        let month_length =
            days_in_month(self.reference.year(), self.reference.month()).unwrap_or(0);
        if day == 0 || day > month_length {
            debug!("event=day_select module=session status=rejected day={day}");
            return false;
        }
        self.selected_day = Some(day);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected_day = None;
    }

    pub fn selected_date_key(&self) -> Option<DateKey> {
        self.selected_day.and_then(|day| self.date_key_for_day(day))
    }

    /// Events of the selected day; empty without a selection.
    pub fn selected_events(&self) -> &[String] {
        match self.selected_date_key() {
            Some(key) => self.store.events_for(&key),
            None => &[],
        }
    }

    /// Adds `text` to the selected day.
    ///
    /// Returns `false` when nothing is selected or `text` is empty.
    pub fn add_event_to_selected(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        match self.selected_date_key() {
            Some(key) => self.store.add_event(&key, text),
            None => false,
        }
    }

    /// Deletes the event at `index` of the selected day.
    pub fn delete_selected_event(&mut self, index: usize) -> bool {
        match self.selected_date_key() {
            Some(key) => self.store.delete_event(&key, index),
            None => false,
        }
    }
}
