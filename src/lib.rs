//! rosterdb - An embedded, atomically-indexed record store for matchmaking player pools
//!
//! Records are JSON property blobs keyed by ID. Every property doubles as a
//! sorted-set index over the records carrying it, and all multi-key writes
//! are applied as all-or-nothing batches.

pub mod engine;
pub mod observability;
pub mod store;
