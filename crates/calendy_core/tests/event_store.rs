use calendy_core::db::{open_db, open_db_in_memory, DbError};
use calendy_core::{
    DateKey, EventStore, LoadOutcome, RepoError, RepoResult, SlotRecord, SlotRepository,
    SqliteSlotRepository, StoreError, DEFAULT_EVENTS_SLOT,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory slots that count writes.
#[derive(Default)]
struct CountingRepository {
    slots: RefCell<HashMap<String, SlotRecord>>,
    writes: Cell<usize>,
}

impl SlotRepository for CountingRepository {
    fn read_slot(&self, name: &str) -> RepoResult<Option<SlotRecord>> {
        Ok(self.slots.borrow().get(name).cloned())
    }

    fn write_slot(&self, name: &str, record: &SlotRecord) -> RepoResult<()> {
        self.writes.set(self.writes.get() + 1);
        self.slots
            .borrow_mut()
            .insert(name.to_string(), record.clone());
        Ok(())
    }

    fn delete_slot(&self, name: &str) -> RepoResult<bool> {
        Ok(self.slots.borrow_mut().remove(name).is_some())
    }
}

/// Slots whose every access fails.
struct FailingRepository;

impl FailingRepository {
    fn error() -> RepoError {
        RepoError::Db(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }
}

impl SlotRepository for FailingRepository {
    fn read_slot(&self, _name: &str) -> RepoResult<Option<SlotRecord>> {
        Err(Self::error())
    }

    fn write_slot(&self, _name: &str, _record: &SlotRecord) -> RepoResult<()> {
        Err(Self::error())
    }

    fn delete_slot(&self, _name: &str) -> RepoResult<bool> {
        Err(Self::error())
    }
}

fn key(value: &str) -> DateKey {
    DateKey::parse(value).unwrap()
}

#[test]
fn add_event_then_read_back() {
    let conn = open_db_in_memory().unwrap();
    let mut store = EventStore::with_default_slot(SqliteSlotRepository::new(&conn));

    assert!(store.add_event(&key("2025-03-15"), "Dentist"));

    assert_eq!(store.events_for(&key("2025-03-15")), ["Dentist"]);
    assert!(store.has_events(&key("2025-03-15")));
    assert!(!store.has_events(&key("2025-03-16")));
}

#[test]
fn events_for_unknown_date_is_empty_and_creates_nothing() {
    let repo = CountingRepository::default();
    let store = EventStore::with_default_slot(&repo);

    assert!(store.events_for(&key("2025-03-15")).is_empty());
    assert!(!store.contains_entry(&key("2025-03-15")));
    assert_eq!(repo.writes.get(), 0);
}

#[test]
fn events_keep_insertion_order() {
    let repo = CountingRepository::default();
    let mut store = EventStore::with_default_slot(&repo);

    for text in ["b", "a", "c"] {
        store.add_event(&key("2025-03-15"), text);
    }

    assert_eq!(store.events_for(&key("2025-03-15")), ["b", "a", "c"]);
    assert_eq!(repo.writes.get(), 3);
}

#[test]
fn deleting_last_event_prunes_entry() {
    let repo = CountingRepository::default();
    let mut store = EventStore::with_default_slot(&repo);
    store.add_event(&key("2025-03-15"), "Dentist");

    assert!(store.delete_event(&key("2025-03-15"), 0));

    assert!(store.events_for(&key("2025-03-15")).is_empty());
    assert!(!store.has_events(&key("2025-03-15")));
    assert!(!store.contains_entry(&key("2025-03-15")));
    assert_eq!(repo.writes.get(), 2);

    let persisted = repo.read_slot(DEFAULT_EVENTS_SLOT).unwrap().unwrap();
    assert_eq!(persisted.value, "{}");
}

#[test]
fn deleting_from_middle_keeps_remaining_order() {
    let repo = CountingRepository::default();
    let mut store = EventStore::with_default_slot(&repo);
    for text in ["one", "two", "three"] {
        store.add_event(&key("2025-03-15"), text);
    }

    assert!(store.delete_event(&key("2025-03-15"), 1));
    assert_eq!(store.events_for(&key("2025-03-15")), ["one", "three"]);
}

#[test]
fn delete_on_missing_date_is_noop_without_persisting() {
    let repo = CountingRepository::default();
    let mut store = EventStore::with_default_slot(&repo);

    assert!(!store.delete_event(&key("2025-01-01"), 5));

    assert_eq!(repo.writes.get(), 0);
    assert!(store.book().is_empty());
}

#[test]
fn delete_with_out_of_range_index_is_noop_without_persisting() {
    let repo = CountingRepository::default();
    let mut store = EventStore::with_default_slot(&repo);
    store.add_event(&key("2025-01-01"), "New year");
    let writes_before = repo.writes.get();

    assert!(!store.delete_event(&key("2025-01-01"), 1));

    assert_eq!(repo.writes.get(), writes_before);
    assert_eq!(store.events_for(&key("2025-01-01")), ["New year"]);
}

#[test]
fn save_then_load_on_fresh_store_reproduces_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendy.db");

    let saved_book = {
        let conn = open_db(&path).unwrap();
        let mut store = EventStore::with_default_slot(SqliteSlotRepository::new(&conn));
        store.add_event(&key("2025-03-15"), "Dentist");
        store.add_event(&key("2025-03-15"), "Gym");
        store.add_event(&key("2024-02-29"), "Leap day");
        store.save();
        store.book().clone()
    };

    let conn = open_db(&path).unwrap();
    let mut fresh = EventStore::with_default_slot(SqliteSlotRepository::new(&conn));
    assert_eq!(fresh.try_load().unwrap(), LoadOutcome::Loaded { dates: 2 });
    assert_eq!(fresh.book(), &saved_book);
    assert_eq!(fresh.events_for(&key("2025-03-15")), ["Dentist", "Gym"]);
}

#[test]
fn persisted_blob_is_plain_json_object() {
    let repo = CountingRepository::default();
    let mut store = EventStore::new(&repo, "calendarEvents");
    store.add_event(&key("2025-03-15"), "Dentist");

    let record = repo.read_slot("calendarEvents").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&record.value).unwrap();
    assert_eq!(value, serde_json::json!({ "2025-03-15": ["Dentist"] }));
    assert_eq!(record.schema_version, 1);
}

#[test]
fn load_accepts_blob_written_by_other_clients() {
    let repo = CountingRepository::default();
    repo.write_slot(
        DEFAULT_EVENTS_SLOT,
        &SlotRecord {
            value: r#"{"2025-07-04":["Fireworks","BBQ"],"2025-07-05":[]}"#.to_string(),
            schema_version: 1,
        },
    )
    .unwrap();

    let mut store = EventStore::with_default_slot(&repo);
    store.load();

    assert_eq!(store.events_for(&key("2025-07-04")), ["Fireworks", "BBQ"]);
    assert!(store.contains_entry(&key("2025-07-05")));
    assert!(!store.has_events(&key("2025-07-05")));
    assert_eq!(store.marked_days(2025, 7), vec![4]);
}

#[test]
fn malformed_blob_leaves_store_unchanged() {
    let repo = CountingRepository::default();
    let mut store = EventStore::with_default_slot(&repo);
    store.add_event(&key("2025-03-15"), "Dentist");

    for garbage in ["not json", "[]", r#"{"2025-03-15":"Dentist"}"#, r#"{"someday":[]}"#] {
        repo.slots.borrow_mut().insert(
            DEFAULT_EVENTS_SLOT.to_string(),
            SlotRecord {
                value: garbage.to_string(),
                schema_version: 1,
            },
        );

        let err = store.try_load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)), "{garbage}: {err}");
        store.load();
        assert_eq!(store.events_for(&key("2025-03-15")), ["Dentist"]);
    }
}

#[test]
fn persistence_failures_are_swallowed() {
    let mut store = EventStore::with_default_slot(FailingRepository);

    store.load();
    assert!(store.book().is_empty());

    assert!(store.add_event(&key("2025-03-15"), "Dentist"));
    assert_eq!(store.events_for(&key("2025-03-15")), ["Dentist"]);
    assert!(store.delete_event(&key("2025-03-15"), 0));

    assert!(matches!(store.try_save(), Err(StoreError::Repo(_))));
    assert!(matches!(store.try_load(), Err(StoreError::Repo(_))));
}
