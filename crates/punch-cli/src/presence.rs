//! File-based presence marker.
//!
//! The original deployment assigned a chat role as the visible "on
//! shift" signal. Here the equivalent side effect is a marker file per
//! active user under the state directory. The ledger append stays
//! authoritative; marker sync is best-effort and callers only log
//! failures.

use std::io;
use std::path::PathBuf;

use punch_core::{PresenceMarker, UserId};

/// Keeps one empty marker file per active user in a directory.
#[derive(Debug, Clone)]
pub struct FilePresenceMarker {
    root: PathBuf,
}

impl FilePresenceMarker {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn marker_path(&self, user: &UserId) -> PathBuf {
        self.root.join(user.as_str())
    }

    /// Whether the marker is currently applied.
    #[must_use]
    pub fn is_active(&self, user: &UserId) -> bool {
        self.marker_path(user).exists()
    }
}

impl PresenceMarker for FilePresenceMarker {
    fn set_active(&self, user: &UserId) -> io::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.marker_path(user), b"")
    }

    fn clear_active(&self, user: &UserId) -> io::Result<()> {
        match std::fs::remove_file(self.marker_path(user)) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn set_and_clear_roundtrip() {
        let temp = tempfile::tempdir().unwrap();
        let marker = FilePresenceMarker::new(temp.path().join("active"));
        let alice = user("alice");

        marker.set_active(&alice).unwrap();
        assert!(marker.is_active(&alice));

        marker.clear_active(&alice).unwrap();
        assert!(!marker.is_active(&alice));
    }

    #[test]
    fn set_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let marker = FilePresenceMarker::new(temp.path().join("active"));
        let alice = user("alice");

        marker.set_active(&alice).unwrap();
        marker.set_active(&alice).unwrap();
        assert!(marker.is_active(&alice));
    }

    #[test]
    fn clear_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let marker = FilePresenceMarker::new(temp.path().join("active"));
        let alice = user("alice");

        // Never set; clearing must still succeed.
        marker.clear_active(&alice).unwrap();
        marker.clear_active(&alice).unwrap();
        assert!(!marker.is_active(&alice));
    }
}
