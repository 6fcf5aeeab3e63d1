//! Error types for the keyspace engine.

use thiserror::Error;

use super::memory::EntryKind;

/// Failures reported by keyspace reads and batch commits.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The key exists but holds a different kind of value.
    #[error("key {key:?} holds a {actual}, operation expects a {expected}")]
    WrongType {
        key: String,
        expected: EntryKind,
        actual: EntryKind,
    },

    /// The value cannot be interpreted as a sorted-set score.
    #[error("cannot interpret {value} as a score: scores are finite numbers")]
    InvalidScore { value: String },
}

impl EngineError {
    pub(crate) fn wrong_type(key: &str, expected: EntryKind, actual: EntryKind) -> Self {
        EngineError::WrongType {
            key: key.to_string(),
            expected,
            actual,
        }
    }

    pub(crate) fn invalid_score(value: impl Into<String>) -> Self {
        EngineError::InvalidScore {
            value: value.into(),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Failures while writing or reading keyspace snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem failure while writing or reading a snapshot file.
    #[error("snapshot i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// The keyspace could not be serialized into a snapshot payload.
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// The snapshot file is not a valid envelope or payload.
    #[error("snapshot is malformed: {reason}")]
    Malformed { reason: String },

    /// The payload bytes do not match the envelope checksum.
    #[error("snapshot checksum mismatch: stored {stored}, computed {computed}")]
    ChecksumMismatch { stored: String, computed: String },

    /// The snapshot was written by an unsupported format version.
    #[error("unsupported snapshot format version {found}, this build reads version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
