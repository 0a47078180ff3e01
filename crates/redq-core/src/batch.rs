// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed command batches for transactional store writes.
//!
//! A [`CommandBatch`] accumulates [`StoreCommand`] descriptors and is
//! handed to [`CommandExecutor::execute`](crate::traits::CommandExecutor)
//! as one store-side transaction. The committed result sequence matches
//! the queued commands positionally, so callers index replies instead of
//! relying on return-value polymorphism.

/// One store operation queued inside a transaction.
///
/// Keys are store keys *before* namespacing; the executor applies the
/// connection namespace transparently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Add `member` to the set at `key`.
    SetAdd { key: String, member: String },
    /// Remove `member` from the set at `key`.
    SetRemove { key: String, member: String },
    /// Add `member` to the sorted set at `key` with `score`.
    SortedSetAdd {
        key: String,
        score: i64,
        member: String,
    },
    /// Unconditionally set `field` to `value` in the hash at `key`.
    HashSet {
        key: String,
        field: String,
        value: String,
    },
    /// Set `field` only when it does not already exist in the hash.
    HashSetIfAbsent {
        key: String,
        field: String,
        value: String,
    },
    /// Increment the integer at `field` in the hash by `amount`.
    HashIncrBy {
        key: String,
        field: String,
        amount: i64,
    },
    /// Rename `old` to `new`.
    RenameKey { old: String, new: String },
}

/// Result of one committed command, in queue position.
///
/// Individual commands can report a logical no-op (for example a
/// conditional set whose field already existed returns `Int(0)`) without
/// aborting the batch; callers inspect each slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchReply {
    /// Integer reply (counts, 0/1 condition flags, post-increment values).
    Int(i64),
    /// Plain status reply (rename).
    Ok,
}

impl BatchReply {
    /// Integer value of the reply, when it has one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            BatchReply::Int(n) => Some(*n),
            BatchReply::Ok => None,
        }
    }
}

/// Ordered queue of store commands committed as one transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandBatch {
    commands: Vec<StoreCommand>,
}

impl CommandBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_add(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.commands.push(StoreCommand::SetAdd {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn set_remove(&mut self, key: impl Into<String>, member: impl Into<String>) -> &mut Self {
        self.commands.push(StoreCommand::SetRemove {
            key: key.into(),
            member: member.into(),
        });
        self
    }

    pub fn sorted_set_add(
        &mut self,
        key: impl Into<String>,
        score: i64,
        member: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(StoreCommand::SortedSetAdd {
            key: key.into(),
            score,
            member: member.into(),
        });
        self
    }

    pub fn hash_set(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(StoreCommand::HashSet {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn hash_set_if_absent(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.commands.push(StoreCommand::HashSetIfAbsent {
            key: key.into(),
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn hash_incr_by(
        &mut self,
        key: impl Into<String>,
        field: impl Into<String>,
        amount: i64,
    ) -> &mut Self {
        self.commands.push(StoreCommand::HashIncrBy {
            key: key.into(),
            field: field.into(),
            amount,
        });
        self
    }

    pub fn rename_key(&mut self, old: impl Into<String>, new: impl Into<String>) -> &mut Self {
        self.commands.push(StoreCommand::RenameKey {
            old: old.into(),
            new: new.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The queued commands, in commit order.
    pub fn commands(&self) -> &[StoreCommand] {
        &self.commands
    }

    /// Consumes the batch, yielding the queued commands.
    pub fn into_commands(self) -> Vec<StoreCommand> {
        self.commands
    }
}
