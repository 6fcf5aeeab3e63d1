//! Indexed record store.
//!
//! Records are JSON property blobs keyed by id. Every property doubles as a
//! secondary index: writing `{"ping.us-east": 70}` for record `p1` stores
//! the blob under `p1` and adds `p1` at score 70 to the sorted set named
//! `ping.us-east`, with the index name tracked in a registry set. Primary
//! writes and index writes land in one atomic batch.
//!
//! # Design Principles
//!
//! - Records are replaced whole, never merged
//! - Primary blob, index memberships, and registry move together atomically
//! - Every outcome is a typed error: missing records, unparsable blobs, and
//!   engine failures are distinguishable
//! - The registry is owned by the store through its options, not ambient
//!   state
//! - Mutations take `&mut self`; sharing a store means wrapping it in the
//!   caller's synchronization

mod config;
mod errors;
mod properties;
mod records;
pub mod registry;

pub use config::{StoreOptions, DEFAULT_PROPERTIES_FIELD, DEFAULT_REGISTRY_KEY};
pub use errors::{PropertiesError, StoreError, StoreResult};
pub use properties::Properties;
pub use records::RecordStore;
