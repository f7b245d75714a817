//! Log command: history transcript plus worked-time totals.

use std::io::Write;

use anyhow::{Result, bail};

use punch_core::{AdminOracle, ClockEvent, LogSummary, UserId, summarize};
use punch_db::{Ledger, LedgerError};

use super::TIMESTAMP_FORMAT;

/// Shows the subject's history. A non-admin actor may only view their
/// own; the gate runs before any query.
pub fn run<W: Write>(
    writer: &mut W,
    ledger: &Ledger,
    actor: &UserId,
    subject: Option<&UserId>,
    oracle: &dyn AdminOracle,
) -> Result<()> {
    let subject = subject.unwrap_or(actor);
    let history = match ledger.log_for(actor, subject, oracle) {
        Ok(history) => history,
        Err(LedgerError::PermissionDenied { .. }) => {
            bail!("you do not have permission to view other users' logs")
        }
        Err(err) => return Err(err.into()),
    };

    match summarize(&history) {
        Some(summary) => render(writer, subject, &history, &summary)?,
        None => writeln!(writer, "No records found.")?,
    }
    Ok(())
}

#[expect(
    clippy::cast_precision_loss,
    reason = "total seconds fit f64 exactly for any realistic ledger"
)]
fn render<W: Write>(
    writer: &mut W,
    subject: &UserId,
    history: &[ClockEvent],
    summary: &LogSummary,
) -> Result<()> {
    writeln!(writer, "Logs for {subject}:")?;
    for event in history {
        writeln!(
            writer,
            "{} at {}",
            event.action,
            event.timestamp.format(TIMESTAMP_FORMAT)
        )?;
    }

    let minutes = summary.total_active.num_seconds() as f64 / 60.0;
    writeln!(writer)?;
    writeln!(writer, "Total logs: {}", summary.total_events)?;
    writeln!(writer, "Total clock-ins: {}", summary.clock_in_count)?;
    writeln!(writer, "Total clock-outs: {}", summary.clock_out_count)?;
    writeln!(writer, "Total logged minutes: {minutes:.2}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use punch_core::ClockAction;

    struct StaticOracle(&'static [&'static str]);

    impl AdminOracle for StaticOracle {
        fn is_admin(&self, actor: &UserId) -> bool {
            self.0.contains(&actor.as_str())
        }
    }

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn event(id: i64, action: ClockAction, hour: u32, min: u32) -> ClockEvent {
        ClockEvent {
            id,
            user_id: user("alice"),
            action,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, hour, min, 0).unwrap(),
        }
    }

    #[test]
    fn render_shows_transcript_and_totals() {
        let history = [
            event(1, ClockAction::In, 9, 0),
            event(2, ClockAction::Out, 17, 0),
        ];
        let summary = summarize(&history).unwrap();

        let mut output = Vec::new();
        render(&mut output, &user("alice"), &history, &summary).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            "Logs for alice:\n\
             clock_in at 2024-01-01 09:00:00\n\
             clock_out at 2024-01-01 17:00:00\n\
             \n\
             Total logs: 2\n\
             Total clock-ins: 1\n\
             Total clock-outs: 1\n\
             Total logged minutes: 480.00\n"
        );
    }

    #[test]
    fn empty_history_reports_no_records() {
        let ledger = Ledger::open_in_memory().unwrap();
        let alice = user("alice");

        let mut output = Vec::new();
        run(&mut output, &ledger, &alice, None, &StaticOracle(&[])).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "No records found.\n");
    }

    #[test]
    fn cross_user_view_denied_for_non_admin() {
        let ledger = Ledger::open_in_memory().unwrap();

        let mut output = Vec::new();
        let err = run(
            &mut output,
            &ledger,
            &user("alice"),
            Some(&user("bob")),
            &StaticOracle(&[]),
        )
        .unwrap_err();

        assert!(err.to_string().contains("do not have permission"));
        assert!(output.is_empty());
    }

    #[test]
    fn cross_user_view_allowed_for_admin() {
        let mut ledger = Ledger::open_in_memory().unwrap();
        ledger.try_clock_in(&user("bob")).unwrap();

        let mut output = Vec::new();
        run(
            &mut output,
            &ledger,
            &user("alice"),
            Some(&user("bob")),
            &StaticOracle(&["alice"]),
        )
        .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.starts_with("Logs for bob:"));
        assert!(output.contains("Total clock-ins: 1"));
    }
}
