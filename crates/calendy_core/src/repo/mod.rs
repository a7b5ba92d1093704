//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the key-value slot contract the event store persists through.
//! - Isolate SQLite query details from store/session orchestration.
//!
//! # Invariants
//! - Repository APIs surface DB transport errors unchanged; deciding whether
//!   to swallow them belongs to callers.

pub mod slot_repo;
