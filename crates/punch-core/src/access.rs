//! Capability traits for the external collaborators.
//!
//! The ledger core is decoupled from any specific identity provider or
//! chat platform. The dispatcher supplies these capabilities; the
//! library crates only ever see the trait objects.

use std::io;

use crate::types::UserId;

/// Permission oracle supplied by the identity collaborator.
///
/// Gates the cross-user history view and the active-set roster. A
/// non-admin may only query their own history.
pub trait AdminOracle {
    fn is_admin(&self, actor: &UserId) -> bool;
}

/// Applies and removes the external "currently active" status marker.
///
/// Both operations must be idempotent: setting an already-set marker
/// and clearing an already-clear one succeed. The ledger append is
/// authoritative; marker sync is best-effort and failures must never
/// roll back an append.
pub trait PresenceMarker {
    fn set_active(&self, user: &UserId) -> io::Result<()>;
    fn clear_active(&self, user: &UserId) -> io::Result<()>;
}

/// Resolves a user ID to a display handle for roster rendering.
///
/// Unresolvable identities are omitted from rendered output, not
/// errored.
pub trait HandleResolver {
    fn resolve(&self, user: &UserId) -> Option<String>;
}
