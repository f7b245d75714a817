//! The append-only clock event record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::action::ClockAction;
use crate::types::UserId;

/// One row of the attendance ledger.
///
/// Events are created once by the store and never mutated or deleted.
/// Current state and totals are always derived from the full sequence,
/// never stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockEvent {
    /// Store-assigned sequence number, monotonically increasing and
    /// never reused.
    pub id: i64,
    /// The subject of the event.
    pub user_id: UserId,
    /// Whether this is a clock-in or a clock-out.
    pub action: ClockAction,
    /// Store-assigned wall-clock time, second precision, UTC.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn event_serialization_roundtrip() {
        let event = ClockEvent {
            id: 7,
            user_id: UserId::new("alice").unwrap(),
            action: ClockAction::In,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        };

        let json = serde_json::to_string(&event).unwrap();
        let parsed: ClockEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, event);
    }

    #[test]
    fn event_rejects_empty_user_id() {
        let json = r#"{
            "id": 1,
            "user_id": "",
            "action": "clock_in",
            "timestamp": "2024-01-01T09:00:00Z"
        }"#;
        let result: Result<ClockEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
