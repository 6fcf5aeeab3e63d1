//! Record CRUD with automatic secondary indexing.
//!
//! Every write couples three things into one atomic batch: the properties
//! blob under the record's primary hash entry, a (score, id) membership in
//! the sorted set named after each property, and the property's name in the
//! registry set. No observer ever sees a record without its indices or an
//! index entry without its record.
//!
//! The registry key and every field name share the record keyspace, so a
//! record id that collides with one of them surfaces as an engine type
//! error rather than silently corrupting either side.

use std::collections::BTreeMap;

use crate::engine::{Batch, MemoryEngine, Score};

use super::config::StoreOptions;
use super::errors::{StoreError, StoreResult};
use super::properties::Properties;
use super::registry;

/// An embedded record store with per-field sorted-set indices.
///
/// Mutations take `&mut self`: one caller at a time, the compile-time
/// rendition of a one-connection-per-worker deployment. Multi-step
/// operations read and commit under that single exclusive borrow, so a
/// discovery read can never interleave with another caller's write.
#[derive(Debug, Default)]
pub struct RecordStore {
    engine: MemoryEngine,
    options: StoreOptions,
}

impl RecordStore {
    /// An empty store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty store with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            engine: MemoryEngine::new(),
            options,
        }
    }

    /// Resumes a store over an existing keyspace, e.g. one loaded from a
    /// snapshot.
    pub fn open(engine: MemoryEngine, options: StoreOptions) -> Self {
        Self { engine, options }
    }

    /// Read access to the underlying keyspace.
    pub fn engine(&self) -> &MemoryEngine {
        &self.engine
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Hands the keyspace back, e.g. for snapshotting.
    pub fn into_engine(self) -> MemoryEngine {
        self.engine
    }

    /// Stores a record and indexes every property, atomically.
    ///
    /// The caller's blob is stored verbatim under the primary entry; for
    /// every property, (value, id) lands in the sorted set named after the
    /// property and the property's name lands in the registry. Values must
    /// be finite numbers or numeric strings. Creating an id that already
    /// exists rewrites it, exactly like [`update`](Self::update).
    pub fn create(&mut self, id: &str, properties_json: &str) -> StoreResult<()> {
        self.write_record(id, properties_json)
    }

    /// Replaces a record wholesale: same write path as
    /// [`create`](Self::create), never a merge.
    ///
    /// With [`StoreOptions::prune_stale_indexes`] set (the default), the
    /// write also removes the id from indices of fields the new blob no
    /// longer carries, in the same atomic batch. With
    /// [`StoreOptions::legacy`] options those stale memberships survive.
    pub fn update(&mut self, id: &str, properties_json: &str) -> StoreResult<()> {
        self.write_record(id, properties_json)
    }

    /// Fetches and parses a record's properties.
    ///
    /// A missing record is [`StoreError::NotFound`], distinguishable from
    /// an unparsable blob and from engine failures.
    pub fn retrieve(&self, id: &str) -> StoreResult<Properties> {
        if id.is_empty() {
            return Err(StoreError::EmptyId);
        }
        self.retrieve_existing(id)?
            .ok_or_else(|| StoreError::not_found(id))
    }

    /// Deletes a record and its index memberships, atomically.
    ///
    /// Index memberships are discovered by reading the record first. A
    /// missing record or an unparsable blob still gets its primary entry
    /// deleted, with no index cleanup; deleting an absent record is a no-op
    /// success. Engine type errors during discovery abort the operation.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::EmptyId);
        }
        let fields: Vec<String> = match self.retrieve_existing(id) {
            Ok(Some(properties)) => properties.field_names().map(str::to_string).collect(),
            Ok(None) => Vec::new(),
            Err(StoreError::Serialization(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        let mut batch = Batch::with_capacity(1 + fields.len());
        batch.delete_key(id);
        for field in &fields {
            batch.sorted_remove(field.as_str(), id);
        }
        self.engine.commit(batch)?;
        Ok(())
    }

    /// Removes a record from every index it participates in, leaving the
    /// primary entry intact.
    ///
    /// The record stays retrievable by id but no longer appears in any
    /// index. Requires the record to exist; running it again on an
    /// already-unindexed record is a no-op success.
    pub fn unindex(&mut self, id: &str) -> StoreResult<()> {
        let properties = self.retrieve(id)?;
        let mut batch = Batch::with_capacity(properties.len());
        for field in properties.field_names() {
            batch.sorted_remove(field, id);
        }
        self.engine.commit(batch)?;
        Ok(())
    }

    /// Lists every index ever written, grouped by namespace.
    ///
    /// Names split at the first `:` or `.`; an undelimited name is a
    /// namespace with no suffixes. Both levels come out sorted.
    pub fn list_indices(&self) -> StoreResult<BTreeMap<String, Vec<String>>> {
        let names = self.engine.set_members(&self.options.registry_key)?;
        Ok(registry::group_index_names(names))
    }

    fn write_record(&mut self, id: &str, properties_json: &str) -> StoreResult<()> {
        if id.is_empty() {
            return Err(StoreError::EmptyId);
        }
        let properties = Properties::parse(properties_json)?;

        // score every value up front so one bad field rejects the whole
        // write before anything is staged
        let mut scored = Vec::with_capacity(properties.len());
        for (field, value) in properties.iter() {
            let score = Score::from_json(value)?;
            scored.push((field, score));
        }

        let stale = if self.options.prune_stale_indexes {
            self.stale_fields(id, &properties)?
        } else {
            Vec::new()
        };

        let mut batch = Batch::with_capacity(1 + 2 * scored.len() + stale.len());
        batch.hash_set(id, self.options.properties_field.as_str(), properties_json);
        for (field, score) in &scored {
            batch.sorted_add(*field, id, *score);
            batch.set_add(self.options.registry_key.as_str(), *field);
        }
        for field in &stale {
            batch.sorted_remove(field.as_str(), id);
        }
        self.engine.commit(batch)?;
        Ok(())
    }

    /// Fields of the currently stored blob that the next blob drops.
    fn stale_fields(&self, id: &str, next: &Properties) -> StoreResult<Vec<String>> {
        let previous = match self.retrieve_existing(id)? {
            Some(properties) => properties,
            None => return Ok(Vec::new()),
        };
        Ok(previous
            .field_names()
            .filter(|field| !next.contains_field(field))
            .map(str::to_string)
            .collect())
    }

    fn retrieve_existing(&self, id: &str) -> StoreResult<Option<Properties>> {
        match self.engine.hash_get(id, &self.options.properties_field)? {
            Some(blob) => Ok(Some(Properties::parse(blob)?)),
            None => Ok(None),
        }
    }
}
