//! Calendar arithmetic for the month view.
//!
//! # Responsibility
//! - Lay out a month as grid cells with leading blanks.
//! - Move a reference date between months.
//!
//! # Invariants
//! - All date arithmetic goes through chrono; nothing here hand-rolls day
//!   overflow.

pub mod grid;
pub mod navigation;
