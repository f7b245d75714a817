//! Status command: the actor's own derived attendance state.

use std::io::Write;

use anyhow::Result;

use punch_core::UserId;
use punch_db::Ledger;

use super::TIMESTAMP_FORMAT;

pub fn run<W: Write>(writer: &mut W, ledger: &Ledger, actor: &UserId) -> Result<()> {
    let state = ledger.session_for(actor)?;

    match (state.active, state.last_transition_at) {
        (true, Some(since)) => {
            writeln!(writer, "Clocked in since {}.", since.format(TIMESTAMP_FORMAT))?;
        }
        (false, Some(at)) => {
            writeln!(
                writer,
                "Not clocked in. Last clocked out at {}.",
                at.format(TIMESTAMP_FORMAT)
            )?;
        }
        _ => {
            writeln!(writer, "Not clocked in. No records yet.")?;
        }
    }
    Ok(())
}
