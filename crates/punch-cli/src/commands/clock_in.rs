//! Clock-in command.

use std::io::Write;

use anyhow::Result;

use punch_core::{PresenceMarker, UserId};
use punch_db::{Ledger, LedgerError};

use super::TIMESTAMP_FORMAT;

/// Clocks the actor in and applies the presence marker.
///
/// An already-active actor gets a rejection message, not an error:
/// the rejection is the expected user-facing outcome and nothing was
/// appended.
pub fn run<W: Write>(
    writer: &mut W,
    ledger: &mut Ledger,
    actor: &UserId,
    marker: &dyn PresenceMarker,
) -> Result<()> {
    match ledger.try_clock_in(actor) {
        Ok(event) => {
            if let Err(err) = marker.set_active(actor) {
                tracing::warn!(user = %actor, error = %err, "failed to apply active marker");
            }
            writeln!(
                writer,
                "{} clocked in at {}",
                actor,
                event.timestamp.format(TIMESTAMP_FORMAT)
            )?;
            Ok(())
        }
        Err(LedgerError::AlreadyActive { .. }) => {
            writeln!(
                writer,
                "You are already clocked in. Clock out first before clocking in again."
            )?;
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
