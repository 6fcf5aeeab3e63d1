//! Observability subsystem.
//!
//! Structured JSON logging for engine lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only: no side effects on execution
//! 2. Synchronous, no buffering, no background threads
//! 3. Deterministic output (sorted field ordering)
//! 4. Logging failures are ignored, never surfaced
//!
//! The record store core does not log: its operations report every outcome
//! through `Result`. Events exist for lifecycle work such as snapshot writes
//! and loads.
//!
//! # Usage
//!
//! ```ignore
//! use rosterdb::observability::{Event, Logger};
//!
//! Logger::log(Event::SnapshotWriteComplete, &[("keys", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
