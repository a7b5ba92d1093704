//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate slot persistence into event-store operations.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod calendar_session;
pub mod event_store;
