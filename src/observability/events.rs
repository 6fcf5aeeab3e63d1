//! Observable lifecycle events.
//!
//! Events are explicit and typed; each carries its own severity so callers
//! cannot misroute a failure as routine output.

use std::fmt;

use super::logger::Severity;

/// Observable events in the engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Snapshot write started
    SnapshotWriteBegin,
    /// Snapshot write complete, file renamed into place
    SnapshotWriteComplete,
    /// Snapshot write failed, target file untouched
    SnapshotWriteFailed,
    /// Snapshot load started
    SnapshotLoadBegin,
    /// Snapshot load complete
    SnapshotLoadComplete,
    /// Snapshot load failed
    SnapshotLoadFailed,
    /// Snapshot payload failed checksum verification
    SnapshotCorruption,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::SnapshotWriteBegin => "SNAPSHOT_WRITE_BEGIN",
            Event::SnapshotWriteComplete => "SNAPSHOT_WRITE_COMPLETE",
            Event::SnapshotWriteFailed => "SNAPSHOT_WRITE_FAILED",
            Event::SnapshotLoadBegin => "SNAPSHOT_LOAD_BEGIN",
            Event::SnapshotLoadComplete => "SNAPSHOT_LOAD_COMPLETE",
            Event::SnapshotLoadFailed => "SNAPSHOT_LOAD_FAILED",
            Event::SnapshotCorruption => "SNAPSHOT_CORRUPTION",
        }
    }

    /// Severity this event logs at
    pub fn severity(&self) -> Severity {
        match self {
            Event::SnapshotWriteFailed | Event::SnapshotLoadFailed | Event::SnapshotCorruption => {
                Severity::Error
            }
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
