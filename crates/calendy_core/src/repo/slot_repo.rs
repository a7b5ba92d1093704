//! Key-value slot repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Read and write named text slots scoped to the application.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Writing a slot replaces its previous value atomically.
//! - Slot names are non-empty.

use crate::db::DbError;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for slot persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    EmptySlotName,
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EmptySlotName => write!(f, "slot name cannot be empty"),
            Self::InvalidData(message) => write!(f, "invalid persisted slot data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::EmptySlotName => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Stored content of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRecord {
    /// UTF-8 payload, opaque to the repository.
    pub value: String,
    /// Version of the payload format written by the caller.
    pub schema_version: u32,
}

/// Repository interface for named key-value slots.
pub trait SlotRepository {
    fn read_slot(&self, name: &str) -> RepoResult<Option<SlotRecord>>;
    fn write_slot(&self, name: &str, record: &SlotRecord) -> RepoResult<()>;
    /// Returns whether a slot was removed.
    fn delete_slot(&self, name: &str) -> RepoResult<bool>;
}

impl<R: SlotRepository + ?Sized> SlotRepository for &R {
    fn read_slot(&self, name: &str) -> RepoResult<Option<SlotRecord>> {
        (**self).read_slot(name)
    }

    fn write_slot(&self, name: &str, record: &SlotRecord) -> RepoResult<()> {
        (**self).write_slot(name, record)
    }

    fn delete_slot(&self, name: &str) -> RepoResult<bool> {
        (**self).delete_slot(name)
    }
}

/// SQLite-backed slot repository over the `kv_slots` table.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn read_slot(&self, name: &str) -> RepoResult<Option<SlotRecord>> {
        ensure_slot_name(name)?;

        let mut stmt = self.conn.prepare(
            "SELECT value, schema_version
             FROM kv_slots
             WHERE name = ?1;",
        )?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_slot_row(row)?));
        }

        Ok(None)
    }

    fn write_slot(&self, name: &str, record: &SlotRecord) -> RepoResult<()> {
        ensure_slot_name(name)?;

        self.conn.execute(
            "INSERT INTO kv_slots (name, value, schema_version, updated_at)
             VALUES (?1, ?2, ?3, (strftime('%s', 'now') * 1000))
             ON CONFLICT(name) DO UPDATE SET
                value = excluded.value,
                schema_version = excluded.schema_version,
                updated_at = excluded.updated_at;",
            params![name, record.value.as_str(), record.schema_version],
        )?;

        Ok(())
    }

    fn delete_slot(&self, name: &str) -> RepoResult<bool> {
        ensure_slot_name(name)?;

        let changed = self
            .conn
            .execute("DELETE FROM kv_slots WHERE name = ?1;", [name])?;
        Ok(changed > 0)
    }
}

fn ensure_slot_name(name: &str) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::EmptySlotName);
    }
    Ok(())
}

fn parse_slot_row(row: &Row<'_>) -> RepoResult<SlotRecord> {
    let raw_version: i64 = row.get("schema_version")?;
    let schema_version = u32::try_from(raw_version).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid schema_version value `{raw_version}` in kv_slots.schema_version"
        ))
    })?;

    Ok(SlotRecord {
        value: row.get("value")?,
        schema_version,
    })
}
