//! Keyspace snapshots.
//!
//! A snapshot is one JSON envelope file:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "created_at": "2026-08-22T11:30:00Z",
//!   "checksum": "crc32:deadbeef",
//!   "payload": "{\"keys\":{}}"
//! }
//! ```
//!
//! The payload is the serialized keyspace and the checksum covers the payload
//! bytes exactly as stored. Dumps write a temporary sibling file, fsync, then
//! rename, so a torn write never leaves a half-snapshot at the target path.
//! Loads verify the format version, then the checksum, then decode.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::observability::{Event, Logger};

use super::errors::{SnapshotError, SnapshotResult};
use super::memory::MemoryEngine;

/// Envelope format version this build writes and reads.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    format_version: u32,
    created_at: String,
    checksum: String,
    payload: String,
}

/// Computes the formatted CRC32 checksum of a payload.
pub fn compute_checksum(payload: &[u8]) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(payload);
    format!("crc32:{:08x}", hasher.finalize())
}

/// Writes the engine's keyspace to `path`.
///
/// # Errors
///
/// Returns [`SnapshotError::Encode`] when the keyspace cannot be serialized
/// and [`SnapshotError::Io`] on filesystem failures. A failed dump leaves
/// any existing snapshot at `path` untouched.
pub fn dump(engine: &MemoryEngine, path: &Path) -> SnapshotResult<()> {
    let path_text = path.display().to_string();
    Logger::log(Event::SnapshotWriteBegin, &[("path", &path_text)]);

    match write_snapshot(engine, path) {
        Ok(checksum) => {
            let keys = engine.len().to_string();
            Logger::log(
                Event::SnapshotWriteComplete,
                &[
                    ("checksum", &checksum),
                    ("keys", &keys),
                    ("path", &path_text),
                ],
            );
            Ok(())
        }
        Err(err) => {
            let reason = err.to_string();
            Logger::log(
                Event::SnapshotWriteFailed,
                &[("error", &reason), ("path", &path_text)],
            );
            Err(err)
        }
    }
}

/// Reads a keyspace back from the snapshot at `path`.
///
/// # Errors
///
/// Returns [`SnapshotError::UnsupportedVersion`] for snapshots written by a
/// different format version, [`SnapshotError::ChecksumMismatch`] when the
/// payload fails verification, and [`SnapshotError::Malformed`] when either
/// envelope or payload fails to decode.
pub fn load(path: &Path) -> SnapshotResult<MemoryEngine> {
    let path_text = path.display().to_string();
    Logger::log(Event::SnapshotLoadBegin, &[("path", &path_text)]);

    match read_snapshot(path) {
        Ok(engine) => {
            let keys = engine.len().to_string();
            Logger::log(
                Event::SnapshotLoadComplete,
                &[("keys", &keys), ("path", &path_text)],
            );
            Ok(engine)
        }
        Err(err) => {
            let event = match &err {
                SnapshotError::ChecksumMismatch { .. } => Event::SnapshotCorruption,
                _ => Event::SnapshotLoadFailed,
            };
            let reason = err.to_string();
            Logger::log(event, &[("error", &reason), ("path", &path_text)]);
            Err(err)
        }
    }
}

fn write_snapshot(engine: &MemoryEngine, path: &Path) -> SnapshotResult<String> {
    let payload = serde_json::to_string(engine).map_err(SnapshotError::Encode)?;
    let checksum = compute_checksum(payload.as_bytes());
    let envelope = Envelope {
        format_version: FORMAT_VERSION,
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        checksum: checksum.clone(),
        payload,
    };
    let json = serde_json::to_string_pretty(&envelope).map_err(SnapshotError::Encode)?;

    let tmp = tmp_sibling(path);
    if let Err(err) = write_and_swap(&tmp, path, json.as_bytes()) {
        // the temp file is useless after a failed swap
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(checksum)
}

fn read_snapshot(path: &Path) -> SnapshotResult<MemoryEngine> {
    let content = fs::read_to_string(path)?;
    let envelope: Envelope = serde_json::from_str(&content).map_err(|e| {
        SnapshotError::Malformed {
            reason: format!("invalid envelope: {}", e),
        }
    })?;

    if envelope.format_version != FORMAT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: envelope.format_version,
            supported: FORMAT_VERSION,
        });
    }

    let computed = compute_checksum(envelope.payload.as_bytes());
    if computed != envelope.checksum {
        return Err(SnapshotError::ChecksumMismatch {
            stored: envelope.checksum,
            computed,
        });
    }

    serde_json::from_str(&envelope.payload).map_err(|e| SnapshotError::Malformed {
        reason: format!("invalid payload: {}", e),
    })
}

fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_and_swap(tmp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(tmp, target)?;

    // the rename is durable only once the directory entry is synced
    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            File::open(parent)?.sync_all()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_format() {
        let checksum = compute_checksum(b"test payload");
        assert!(checksum.starts_with("crc32:"));
        assert_eq!(checksum.len(), "crc32:".len() + 8);
        assert!(checksum["crc32:".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_checksum_of_empty_payload() {
        assert_eq!(compute_checksum(b""), "crc32:00000000");
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let a = compute_checksum(b"same bytes");
        let b = compute_checksum(b"same bytes");
        assert_eq!(a, b);
        assert_ne!(compute_checksum(b"other bytes"), a);
    }

    #[test]
    fn test_tmp_sibling_stays_in_directory() {
        let tmp = tmp_sibling(Path::new("/data/snapshots/pool.json"));
        assert_eq!(tmp, Path::new("/data/snapshots/pool.json.tmp"));
    }

    #[test]
    fn test_envelope_field_names() {
        let envelope = Envelope {
            format_version: FORMAT_VERSION,
            created_at: "2026-08-22T11:30:00Z".to_string(),
            checksum: "crc32:00000000".to_string(),
            payload: "{\"keys\":{}}".to_string(),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["format_version"], 1);
        assert_eq!(parsed["created_at"], "2026-08-22T11:30:00Z");
        assert_eq!(parsed["checksum"], "crc32:00000000");
        assert!(parsed["payload"].is_string());
    }
}
