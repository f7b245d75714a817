//! Active command: the admin-facing roster of open sessions.

use std::io::Write;

use anyhow::{Result, bail};

use punch_core::{AdminOracle, HandleResolver, UserId};
use punch_db::{Ledger, LedgerError};

/// Lists users whose derived state is active, rendered through the
/// handle resolver. Unresolvable identities are silently dropped.
pub fn run<W: Write>(
    writer: &mut W,
    ledger: &Ledger,
    actor: &UserId,
    oracle: &dyn AdminOracle,
    handles: &dyn HandleResolver,
) -> Result<()> {
    let roster = match ledger.active_users(actor, oracle) {
        Ok(roster) => roster,
        Err(LedgerError::PermissionDenied { .. }) => {
            bail!("you do not have permission to use this command")
        }
        Err(err) => return Err(err.into()),
    };

    let names: Vec<String> = roster.iter().filter_map(|user| handles.resolve(user)).collect();
    if names.is_empty() {
        writeln!(writer, "No users are currently clocked in.")?;
        return Ok(());
    }

    writeln!(writer, "Currently clocked in:")?;
    for name in names {
        writeln!(writer, "- {name}")?;
    }
    Ok(())
}
