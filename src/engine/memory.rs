//! In-memory keyspace.
//!
//! One ordered map of key -> typed entry. A key holds exactly one kind of
//! value (hash, sorted set, or plain set) from creation until deletion;
//! operations against a key of another kind fail with
//! [`EngineError::WrongType`] and are never coerced.
//!
//! All writes land through [`MemoryEngine::commit`]: commands stage against
//! an overlay of the live keyspace and merge only if every command staged
//! cleanly, so a failing batch leaves the keyspace untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::batch::{Batch, Command};
use super::errors::{EngineError, EngineResult};
use super::score::Score;
use super::zset::SortedSet;

/// The kind of value a key holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Hash,
    Sorted,
    Set,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Hash => "hash",
            EntryKind::Sorted => "sorted set",
            EntryKind::Set => "set",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One keyspace value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
enum Entry {
    Hash(BTreeMap<String, String>),
    Sorted(SortedSet),
    Set(BTreeSet<String>),
}

impl Entry {
    fn kind(&self) -> EntryKind {
        match self {
            Entry::Hash(_) => EntryKind::Hash,
            Entry::Sorted(_) => EntryKind::Sorted,
            Entry::Set(_) => EntryKind::Set,
        }
    }
}

/// Overlay of pending changes: `Some` replaces the key, `None` removes it.
type Overlay = BTreeMap<String, Option<Entry>>;

/// The keyspace engine.
///
/// Reads take `&self` and never fail on missing keys: a missing key reads as
/// empty. Kind mismatches are the only read errors. Serialization covers the
/// full keyspace, which is what [`snapshot`](super::snapshot) persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryEngine {
    keys: BTreeMap<String, Entry>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies every command in the batch, or none of them.
    pub fn commit(&mut self, batch: Batch) -> EngineResult<()> {
        let mut staged = Overlay::new();
        for command in batch.into_commands() {
            self.stage(&mut staged, command)?;
        }
        for (key, slot) in staged {
            match slot {
                Some(entry) => {
                    self.keys.insert(key, entry);
                }
                None => {
                    self.keys.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn stage(&self, staged: &mut Overlay, command: Command) -> EngineResult<()> {
        match command {
            Command::HashSet { key, field, value } => {
                let mut fields = match self.take_staged(staged, &key) {
                    Some(Entry::Hash(fields)) => fields,
                    Some(other) => {
                        return Err(EngineError::wrong_type(&key, EntryKind::Hash, other.kind()))
                    }
                    None => BTreeMap::new(),
                };
                fields.insert(field, value);
                staged.insert(key, Some(Entry::Hash(fields)));
            }
            Command::DeleteKey { key } => {
                staged.insert(key, None);
            }
            Command::SortedAdd { key, member, score } => {
                let mut set = match self.take_staged(staged, &key) {
                    Some(Entry::Sorted(set)) => set,
                    Some(other) => {
                        return Err(EngineError::wrong_type(&key, EntryKind::Sorted, other.kind()))
                    }
                    None => SortedSet::new(),
                };
                set.insert(&member, score);
                staged.insert(key, Some(Entry::Sorted(set)));
            }
            Command::SortedRemove { key, member } => match self.take_staged(staged, &key) {
                Some(Entry::Sorted(mut set)) => {
                    set.remove(&member);
                    // an emptied collection vanishes with its key
                    let slot = if set.is_empty() {
                        None
                    } else {
                        Some(Entry::Sorted(set))
                    };
                    staged.insert(key, slot);
                }
                Some(other) => {
                    return Err(EngineError::wrong_type(&key, EntryKind::Sorted, other.kind()))
                }
                None => {
                    staged.insert(key, None);
                }
            },
            Command::SetAdd { key, member } => {
                let mut members = match self.take_staged(staged, &key) {
                    Some(Entry::Set(members)) => members,
                    Some(other) => {
                        return Err(EngineError::wrong_type(&key, EntryKind::Set, other.kind()))
                    }
                    None => BTreeSet::new(),
                };
                members.insert(member);
                staged.insert(key, Some(Entry::Set(members)));
            }
            Command::SetRemove { key, member } => match self.take_staged(staged, &key) {
                Some(Entry::Set(mut members)) => {
                    members.remove(&member);
                    let slot = if members.is_empty() {
                        None
                    } else {
                        Some(Entry::Set(members))
                    };
                    staged.insert(key, slot);
                }
                Some(other) => {
                    return Err(EngineError::wrong_type(&key, EntryKind::Set, other.kind()))
                }
                None => {
                    staged.insert(key, None);
                }
            },
        }
        Ok(())
    }

    /// Pops the entry as the batch so far sees it: the overlay wins over the
    /// live keyspace, and the first touch of a live key clones it into play.
    fn take_staged(&self, staged: &mut Overlay, key: &str) -> Option<Entry> {
        match staged.remove(key) {
            Some(slot) => slot,
            None => self.keys.get(key).cloned(),
        }
    }

    // ---- reads ----

    /// Value of one hash field. Missing key or missing field is `None`.
    pub fn hash_get(&self, key: &str, field: &str) -> EngineResult<Option<&str>> {
        match self.keys.get(key) {
            Some(Entry::Hash(fields)) => Ok(fields.get(field).map(String::as_str)),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Hash, other.kind())),
            None => Ok(None),
        }
    }

    /// Score of a member, or `None` when the key or member is missing.
    pub fn sorted_score(&self, key: &str, member: &str) -> EngineResult<Option<Score>> {
        match self.keys.get(key) {
            Some(Entry::Sorted(set)) => Ok(set.score(member)),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Sorted, other.kind())),
            None => Ok(None),
        }
    }

    /// All members of a sorted set in rank order. Missing keys are empty.
    pub fn sorted_members(&self, key: &str) -> EngineResult<Vec<(String, Score)>> {
        match self.keys.get(key) {
            Some(Entry::Sorted(set)) => Ok(set
                .iter_ranked()
                .map(|(member, score)| (member.to_string(), score))
                .collect()),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Sorted, other.kind())),
            None => Ok(Vec::new()),
        }
    }

    /// Members scored within the inclusive `[min, max]` range, in rank order.
    pub fn sorted_range_by_score(
        &self,
        key: &str,
        min: Score,
        max: Score,
    ) -> EngineResult<Vec<(String, Score)>> {
        match self.keys.get(key) {
            Some(Entry::Sorted(set)) => Ok(set
                .range_by_score(min, max)
                .map(|(member, score)| (member.to_string(), score))
                .collect()),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Sorted, other.kind())),
            None => Ok(Vec::new()),
        }
    }

    /// Member count of a sorted set. Missing keys count zero.
    pub fn sorted_len(&self, key: &str) -> EngineResult<usize> {
        match self.keys.get(key) {
            Some(Entry::Sorted(set)) => Ok(set.len()),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Sorted, other.kind())),
            None => Ok(0),
        }
    }

    /// All members of a plain set in lexicographic order. Missing keys are
    /// empty.
    pub fn set_members(&self, key: &str) -> EngineResult<Vec<String>> {
        match self.keys.get(key) {
            Some(Entry::Set(members)) => Ok(members.iter().cloned().collect()),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Set, other.kind())),
            None => Ok(Vec::new()),
        }
    }

    /// Whether a plain set contains the member. Missing keys contain nothing.
    pub fn set_contains(&self, key: &str, member: &str) -> EngineResult<bool> {
        match self.keys.get(key) {
            Some(Entry::Set(members)) => Ok(members.contains(member)),
            Some(other) => Err(EngineError::wrong_type(key, EntryKind::Set, other.kind())),
            None => Ok(false),
        }
    }

    /// Kind of the value at `key`, or `None` when the key is missing.
    pub fn key_kind(&self, key: &str) -> Option<EntryKind> {
        self.keys.get(key).map(Entry::kind)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
