//! Domain model for date-keyed calendar events.
//!
//! # Responsibility
//! - Define the date identifier shared by grid, store and UI callers.
//! - Define the serializable event mapping persisted between sessions.
//!
//! # Invariants
//! - Events are addressed only through a validated `DateKey`.

pub mod date_key;
pub mod event_book;
