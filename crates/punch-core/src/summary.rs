//! Aggregating worked time from an event sequence.

use chrono::{DateTime, Duration, Utc};

use crate::action::ClockAction;
use crate::event::ClockEvent;

/// Aggregate statistics over one user's full event history.
///
/// Produced by [`summarize`]. The transcript itself is the event
/// sequence the caller already holds; rendering is left to the
/// dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSummary {
    /// Sum of every well-formed clock-in/clock-out interval.
    pub total_active: Duration,
    pub clock_in_count: usize,
    pub clock_out_count: usize,
    pub total_events: usize,
}

impl LogSummary {
    /// Total active time in whole minutes, rounded down.
    #[must_use]
    pub fn total_minutes(&self) -> i64 {
        self.total_active.num_minutes()
    }
}

/// Walks a user's history in timestamp order and computes totals.
///
/// Returns `None` for an empty history so callers can report "no
/// records" distinctly from a zero-duration result.
///
/// Pairing is a single-pass stack-of-one walk: a clock-in opens an
/// interval, a clock-out closes it and adds the delta. A clock-in
/// while one is already open replaces it and the stale interval is
/// discarded; a clock-out with nothing open contributes nothing.
#[must_use]
pub fn summarize(events: &[ClockEvent]) -> Option<LogSummary> {
    if events.is_empty() {
        return None;
    }

    let mut total_active = Duration::zero();
    let mut clock_in_count = 0;
    let mut clock_out_count = 0;
    let mut open_clock_in: Option<DateTime<Utc>> = None;

    for event in events {
        match event.action {
            ClockAction::In => {
                clock_in_count += 1;
                open_clock_in = Some(event.timestamp);
            }
            ClockAction::Out => {
                clock_out_count += 1;
                if let Some(clock_in) = open_clock_in.take() {
                    total_active = total_active + (event.timestamp - clock_in);
                }
            }
        }
    }

    Some(LogSummary {
        total_active,
        clock_in_count,
        clock_out_count,
        total_events: events.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use chrono::TimeZone;

    fn event(id: i64, action: ClockAction, hour: u32, min: u32) -> ClockEvent {
        ClockEvent {
            id,
            user_id: UserId::new("alice").unwrap(),
            action,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap(),
        }
    }

    #[test]
    fn empty_history_reports_no_records() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn full_shift_totals_480_minutes() {
        let events = [
            event(1, ClockAction::In, 9, 0),
            event(2, ClockAction::Out, 17, 0),
        ];
        let summary = summarize(&events).unwrap();
        assert_eq!(summary.total_minutes(), 480);
        assert_eq!(summary.clock_in_count, 1);
        assert_eq!(summary.clock_out_count, 1);
        assert_eq!(summary.total_events, 2);
    }

    #[test]
    fn stale_open_interval_is_discarded() {
        // [in@9:00, in@10:00, out@11:00] pairs only the second
        // clock-in; the first contributes nothing.
        let events = [
            event(1, ClockAction::In, 9, 0),
            event(2, ClockAction::In, 10, 0),
            event(3, ClockAction::Out, 11, 0),
        ];
        let summary = summarize(&events).unwrap();
        assert_eq!(summary.total_minutes(), 60);
        assert_eq!(summary.clock_in_count, 2);
        assert_eq!(summary.clock_out_count, 1);
    }

    #[test]
    fn orphan_clock_out_contributes_nothing() {
        let events = [event(1, ClockAction::Out, 9, 0)];
        let summary = summarize(&events).unwrap();
        assert_eq!(summary.total_active, Duration::zero());
        assert_eq!(summary.clock_in_count, 0);
        assert_eq!(summary.clock_out_count, 1);
        assert_eq!(summary.total_events, 1);
    }

    #[test]
    fn consecutive_clock_outs_close_only_once() {
        let events = [
            event(1, ClockAction::In, 9, 0),
            event(2, ClockAction::Out, 10, 0),
            event(3, ClockAction::Out, 11, 0),
        ];
        let summary = summarize(&events).unwrap();
        assert_eq!(summary.total_minutes(), 60);
        assert_eq!(summary.clock_out_count, 2);
    }

    #[test]
    fn multiple_shifts_accumulate() {
        let events = [
            event(1, ClockAction::In, 9, 0),
            event(2, ClockAction::Out, 12, 0),
            event(3, ClockAction::In, 13, 0),
            event(4, ClockAction::Out, 17, 30),
        ];
        let summary = summarize(&events).unwrap();
        assert_eq!(summary.total_minutes(), 180 + 270);
        assert_eq!(summary.total_events, 4);
    }

    #[test]
    fn trailing_open_clock_in_is_not_counted() {
        // An unclosed shift contributes nothing until it is closed.
        let events = [
            event(1, ClockAction::In, 9, 0),
            event(2, ClockAction::Out, 10, 0),
            event(3, ClockAction::In, 11, 0),
        ];
        let summary = summarize(&events).unwrap();
        assert_eq!(summary.total_minutes(), 60);
    }

    #[test]
    fn well_formed_pair_adds_exactly_its_delta() {
        let before = [
            event(1, ClockAction::In, 8, 0),
            event(2, ClockAction::Out, 9, 0),
        ];
        let base = summarize(&before).unwrap().total_active;

        let after = [
            event(1, ClockAction::In, 8, 0),
            event(2, ClockAction::Out, 9, 0),
            event(3, ClockAction::In, 10, 0),
            event(4, ClockAction::Out, 10, 45),
        ];
        let total = summarize(&after).unwrap().total_active;
        assert_eq!(total - base, Duration::minutes(45));
    }
}
