//! Atomic write batches.
//!
//! A batch accumulates commands and hands them to
//! [`MemoryEngine::commit`](super::MemoryEngine::commit) as one unit: either
//! every command applies or none do. Commands apply in insertion order, and
//! later commands in the same batch observe the effects of earlier ones.

use super::score::Score;

/// A single keyspace write.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Set one field of the hash at `key`, creating the hash if absent.
    HashSet {
        key: String,
        field: String,
        value: String,
    },
    /// Remove `key` whatever kind it holds. Missing keys are a no-op.
    DeleteKey { key: String },
    /// Insert or re-score `member` in the sorted set at `key`, creating the
    /// set if absent.
    SortedAdd {
        key: String,
        member: String,
        score: Score,
    },
    /// Remove `member` from the sorted set at `key`. Missing keys and
    /// missing members are a no-op.
    SortedRemove { key: String, member: String },
    /// Insert `member` into the plain set at `key`, creating the set if
    /// absent.
    SetAdd { key: String, member: String },
    /// Remove `member` from the plain set at `key`. Missing keys and
    /// missing members are a no-op.
    SetRemove { key: String, member: String },
}

/// Ordered command accumulator for one atomic commit.
#[derive(Debug, Default)]
pub struct Batch {
    commands: Vec<Command>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    pub fn hash_set(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(Command::HashSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn delete_key(&mut self, key: impl Into<String>) -> &mut Self {
        self.commands.push(Command::DeleteKey { key: key.into() });
        self
    }

    pub fn sorted_add(
        &mut self,
        key: impl Into<String>,
        member: impl Into<String>,
        score: Score,
    ) -> &mut Self {
        self.commands.push(Command::SortedAdd {
            key: key.into(),
            member: member.into(),
            score,
        });
        self
    }

    pub fn sorted_remove(
        &mut self,
        key: impl Into<String>,
        member: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(Command::SortedRemove {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn set_add(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.commands.push(Command::SetAdd {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn set_remove(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.commands.push(Command::SetRemove {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub(crate) fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_starts_empty() {
        let batch = Batch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_batch_keeps_insertion_order() {
        let score = Score::from_f64(70.0).unwrap();
        let mut batch = Batch::new();
        batch
            .hash_set("p1", "properties", "{}")
            .sorted_add("ping", "p1", score)
            .set_add("indices", "ping")
            .delete_key("old");

        assert_eq!(batch.len(), 4);
        assert!(matches!(batch.commands()[0], Command::HashSet { .. }));
        assert!(matches!(batch.commands()[1], Command::SortedAdd { .. }));
        assert!(matches!(batch.commands()[2], Command::SetAdd { .. }));
        assert!(matches!(batch.commands()[3], Command::DeleteKey { .. }));
    }

    #[test]
    fn test_with_capacity_is_still_empty() {
        let batch = Batch::with_capacity(16);
        assert!(batch.is_empty());
    }
}
