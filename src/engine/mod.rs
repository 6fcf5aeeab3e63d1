//! Embedded keyspace engine.
//!
//! A single ordered keyspace where every key holds exactly one kind of value
//! (hash, sorted set, or plain set) until deleted. Writes go through
//! [`Batch`]es committed all-or-nothing; reads of missing keys are empty,
//! not errors.
//!
//! # Design Principles
//!
//! - One kind per key (kind mismatches fail, they are never coerced)
//! - Batch commits are atomic (stage everything, merge only on full success)
//! - Empty collections are removed together with their key
//! - Scores are finite doubles with a total order
//! - Deterministic iteration (ordered maps and rank-ordered sets throughout)

mod batch;
mod errors;
mod memory;
mod score;
pub mod snapshot;
mod zset;

pub use batch::{Batch, Command};
pub use errors::{EngineError, EngineResult, SnapshotError, SnapshotResult};
pub use memory::{EntryKind, MemoryEngine};
pub use score::Score;
pub use zset::SortedSet;
