//! Core domain logic for the attendance ledger.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: the append-only clock-in/clock-out record types
//! - Session resolution: deriving a user's current state from history
//! - Summaries: aggregating worked time from an event sequence
//!
//! Everything here is pure: storage and command dispatch live in the
//! `punch-db` and `punch-cli` crates.

pub mod access;
pub mod action;
pub mod event;
pub mod session;
pub mod summary;
pub mod types;

pub use access::{AdminOracle, HandleResolver, PresenceMarker};
pub use action::{ClockAction, UnknownClockAction};
pub use event::ClockEvent;
pub use session::{SessionState, resolve_session};
pub use summary::{LogSummary, summarize};
pub use types::{UserId, ValidationError};
