//! Clock-out command.

use std::io::Write;

use anyhow::Result;

use punch_core::{PresenceMarker, UserId};
use punch_db::Ledger;

use super::TIMESTAMP_FORMAT;

/// Clocks the actor out and clears the presence marker.
///
/// Clocking out while not active is accepted and recorded; the ledger
/// documents that policy, this command just surfaces the result.
pub fn run<W: Write>(
    writer: &mut W,
    ledger: &mut Ledger,
    actor: &UserId,
    marker: &dyn PresenceMarker,
) -> Result<()> {
    let event = ledger.clock_out(actor)?;
    if let Err(err) = marker.clear_active(actor) {
        tracing::warn!(user = %actor, error = %err, "failed to clear active marker");
    }
    writeln!(
        writer,
        "{} clocked out at {}",
        actor,
        event.timestamp.format(TIMESTAMP_FORMAT)
    )?;
    Ok(())
}
