//! Deriving a user's current session state from event history.
//!
//! The ledger keeps no mutable "is active" flag. State is recomputed
//! from the ordered event sequence every time, which keeps the log
//! tamper-evident and the resolver idempotent and side-effect-free.

use chrono::{DateTime, Utc};

use crate::action::ClockAction;
use crate::event::ClockEvent;
use crate::types::UserId;

/// Derived, never-persisted session state for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user_id: UserId,
    /// Whether the user is currently clocked in.
    pub active: bool,
    /// Timestamp of the event that produced the current state: the
    /// latest clock-in when active, the latest clock-out otherwise.
    /// `None` for a user with no events.
    pub last_transition_at: Option<DateTime<Utc>>,
}

/// Resolves the current session state for `user` from their event
/// history.
///
/// `events` must be the user's full history ordered by timestamp
/// ascending with ties broken by id, which is the order the store
/// materializes. The user is active iff they have at least one
/// clock-in and no clock-out with a timestamp strictly greater than
/// their latest clock-in.
#[must_use]
pub fn resolve_session(user: &UserId, events: &[ClockEvent]) -> SessionState {
    let mut latest_in: Option<DateTime<Utc>> = None;
    let mut latest_out: Option<DateTime<Utc>> = None;

    for event in events {
        debug_assert_eq!(&event.user_id, user, "history must belong to one user");
        match event.action {
            ClockAction::In => latest_in = Some(event.timestamp),
            ClockAction::Out => latest_out = Some(event.timestamp),
        }
    }

    let active = match (latest_in, latest_out) {
        (Some(clock_in), Some(clock_out)) => clock_out <= clock_in,
        (Some(_), None) => true,
        (None, _) => false,
    };

    SessionState {
        user_id: user.clone(),
        active,
        last_transition_at: if active { latest_in } else { latest_out },
    }
}
