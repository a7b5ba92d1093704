//! Event store use-case service.
//!
//! # Responsibility
//! - Own the in-memory `EventBook` for one session.
//! - Persist the whole book to a named slot after every mutation.
//!
//! # Invariants
//! - `try_*` methods report persistence failures; `save`/`load`/mutations
//!   log and swallow them, so callers never observe a storage error.
//! - A failed or rejected load leaves the in-memory book untouched.
//! - A stored record of a newer schema version is never overwritten.
//! - A rejected mutation (empty text, unknown date, bad index) never writes.
//! - Event text is never written to logs.

use crate::config::DEFAULT_EVENTS_SLOT;
use crate::model::date_key::DateKey;
use crate::model::event_book::{EventBook, EVENT_BOOK_SCHEMA_VERSION};
use crate::repo::slot_repo::{RepoError, SlotRecord, SlotRepository};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Repo(RepoError),
    Serialize(serde_json::Error),
    /// Stored blob is not a `{"yyyy-MM-dd": [string]}` object.
    Malformed(serde_json::Error),
    UnsupportedSchemaVersion { stored: u32, supported: u32 },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize events: {err}"),
            Self::Malformed(err) => write!(f, "stored events are malformed: {err}"),
            Self::UnsupportedSchemaVersion { stored, supported } => write!(
                f,
                "stored events schema version {stored} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Malformed(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Result of reading the events slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Slot content replaced the in-memory book.
    Loaded { dates: usize },
    /// Slot has never been written; the book is unchanged.
    Missing,
}

/// Date-keyed event lists backed by one key-value slot.
pub struct EventStore<R: SlotRepository> {
    repo: R,
    slot: String,
    book: EventBook,
}

impl<R: SlotRepository> EventStore<R> {
    /// Creates an empty store persisting to `slot`. Nothing is read yet.
    pub fn new(repo: R, slot: impl Into<String>) -> Self {
        Self {
            repo,
            slot: slot.into(),
            book: EventBook::new(),
        }
    }

    /// Creates an empty store persisting to the default slot.
    pub fn with_default_slot(repo: R) -> Self {
        Self::new(repo, DEFAULT_EVENTS_SLOT)
    }

    pub fn slot_name(&self) -> &str {
        &self.slot
    }

    pub fn book(&self) -> &EventBook {
        &self.book
    }

    /// Returns events for `key` in insertion order; empty when absent.
    pub fn events_for(&self, key: &DateKey) -> &[String] {
        self.book.events_for(key)
    }

    /// Whether `key` has an entry with at least one event.
    pub fn has_events(&self, key: &DateKey) -> bool {
        self.book.has_events(key)
    }

    /// Whether `key` has an entry at all, even an empty one.
    pub fn contains_entry(&self, key: &DateKey) -> bool {
        self.book.contains_entry(key)
    }

    /// Day numbers of `(year, month)` carrying events.
    pub fn marked_days(&self, year: i32, month: u32) -> Vec<u32> {
        self.book.marked_days(year, month)
    }

    /// Appends `text` to the events of `key` and saves.
    ///
    /// Returns `false` without saving when `text` is empty. Whitespace is
    /// not trimmed here.
    pub fn add_event(&mut self, key: &DateKey, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.is_empty() {
            debug!("event=event_add module=store status=skipped reason=empty_text date={key}");
            return false;
        }

        self.book.append(*key, text);
        info!(
            "event=event_add module=store status=ok date={} count={}",
            key,
            self.book.events_for(key).len()
        );
        self.save();
        true
    }

    /// Removes the event at `index` for `key` and saves.
    ///
    /// Returns `false` without saving when `key` has no entry or `index` is
    /// out of bounds. Removing the last event drops the entry.
    pub fn delete_event(&mut self, key: &DateKey, index: usize) -> bool {
        if self.book.remove_at(key, index).is_none() {
            debug!(
                "event=event_delete module=store status=skipped reason=no_such_event date={key} index={index}"
            );
            return false;
        }

        info!(
            "event=event_delete module=store status=ok date={} remaining={}",
            key,
            self.book.events_for(key).len()
        );
        self.save();
        true
    }

    /// Persists the whole book, logging and discarding any failure.
    pub fn save(&self) {
        if let Err(err) = self.try_save() {
            warn!(
                "event=events_save module=store status=error slot={} error={}",
                self.slot, err
            );
        }
    }

    /// Persists the whole book to the slot.
    ///
    /// A record written by a newer format is never overwritten.
    ///
    /// # Errors
    /// - `StoreError::Serialize` if the book cannot be encoded.
    /// - `StoreError::UnsupportedSchemaVersion` if the stored record is newer.
    /// - `StoreError::Repo` if the slot cannot be read or written.
    pub fn try_save(&self) -> StoreResult<()> {
        if let Some(existing) = self.repo.read_slot(&self.slot)? {
            ensure_supported(existing.schema_version)?;
        }

        let value = self.book.to_json().map_err(StoreError::Serialize)?;
        let record = SlotRecord {
            value,
            schema_version: EVENT_BOOK_SCHEMA_VERSION,
        };
        self.repo.write_slot(&self.slot, &record)?;
        debug!(
            "event=events_save module=store status=ok slot={} dates={} events={}",
            self.slot,
            self.book.len(),
            self.book.event_count()
        );
        Ok(())
    }

    /// Replaces the book with the slot content; failures keep the current book.
    pub fn load(&mut self) {
        match self.try_load() {
            Ok(LoadOutcome::Loaded { dates }) => info!(
                "event=events_load module=store status=ok slot={} dates={}",
                self.slot, dates
            ),
            Ok(LoadOutcome::Missing) => info!(
                "event=events_load module=store status=missing slot={}",
                self.slot
            ),
            Err(err) => warn!(
                "event=events_load module=store status=error slot={} error={}",
                self.slot, err
            ),
        }
    }

    /// Replaces the book with the slot content.
    ///
    /// # Errors
    /// - `StoreError::Repo` if the slot cannot be read.
    /// - `StoreError::UnsupportedSchemaVersion` for blobs written by a newer
    ///   format.
    /// - `StoreError::Malformed` if the blob is not the expected mapping.
    ///
    /// On error the in-memory book is unchanged.
    pub fn try_load(&mut self) -> StoreResult<LoadOutcome> {
        let Some(record) = self.repo.read_slot(&self.slot)? else {
            return Ok(LoadOutcome::Missing);
        };

        ensure_supported(record.schema_version)?;

        let book = EventBook::from_json(&record.value).map_err(StoreError::Malformed)?;
        let dates = book.len();
        self.book = book;
        Ok(LoadOutcome::Loaded { dates })
    }

    /// Drops every event and removes the slot.
    ///
    /// Returns whether a stored slot existed.
    ///
    /// # Errors
    /// - `StoreError::UnsupportedSchemaVersion` if the stored record is newer;
    ///   nothing is removed then.
    /// - `StoreError::Repo` if the slot cannot be read or removed.
    pub fn try_clear(&mut self) -> StoreResult<bool> {
        if let Some(existing) = self.repo.read_slot(&self.slot)? {
            ensure_supported(existing.schema_version)?;
        }

        let removed = self.repo.delete_slot(&self.slot)?;
        self.book = EventBook::new();
        info!(
            "event=events_clear module=store status=ok slot={} removed={}",
            self.slot, removed
        );
        Ok(removed)
    }
}

fn ensure_supported(stored: u32) -> StoreResult<()> {
    if stored > EVENT_BOOK_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            stored,
            supported: EVENT_BOOK_SCHEMA_VERSION,
        });
    }
    Ok(())
}
