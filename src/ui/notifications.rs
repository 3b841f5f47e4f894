//! Operator notifications raised by the snapshot flow

use std::fmt;

/// A one-shot message for the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Server persisted the snapshot
    SnapshotSaved {
        /// Server-side path of the saved file, when reported
        filename: Option<String>,
    },
    /// Server answered but did not save the snapshot
    SnapshotFailed,
    /// The snapshot could not be encoded, sent or understood
    SnapshotError,
}

impl Notification {
    /// Whether this notification reports a failure
    pub fn is_failure(&self) -> bool {
        !matches!(self, Notification::SnapshotSaved { .. })
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::SnapshotSaved {
                filename: Some(filename),
            } => write!(f, "Snapshot saved: {}", filename),
            Notification::SnapshotSaved { filename: None } => write!(f, "Snapshot saved"),
            Notification::SnapshotFailed => write!(f, "Snapshot failed"),
            Notification::SnapshotError => write!(f, "Snapshot error"),
        }
    }
}
