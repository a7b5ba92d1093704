//! Flutter-facing bridge for the Calendy core.

pub mod api;
