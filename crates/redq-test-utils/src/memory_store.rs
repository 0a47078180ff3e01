// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory store double implementing [`CommandExecutor`].
//!
//! Every immediate call and every committed batch is recorded, so tests
//! can assert exact transaction contents ("exactly one `HashSet`, no
//! renames") and zero-store-call properties. Transactions apply all
//! commands or, with injected failure, none.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use redq_core::batch::{BatchReply, CommandBatch, StoreCommand};
use redq_core::error::RedqError;
use redq_core::traits::CommandExecutor;
use redq_core::types::StoreTime;

#[derive(Default)]
struct Inner {
    hashes: HashMap<String, HashMap<String, String>>,
    sets: HashMap<String, BTreeMap<String, ()>>,
    sorted_sets: HashMap<String, HashMap<String, i64>>,
    clock: Option<StoreTime>,
    field_reads: Vec<(String, Vec<String>)>,
    clock_reads: usize,
    committed: Vec<Vec<StoreCommand>>,
    fail_next_call: bool,
    fail_next_commit: bool,
}

impl Inner {
    fn apply(&mut self, command: &StoreCommand) -> BatchReply {
        match command {
            StoreCommand::SetAdd { key, member } => {
                let added = self
                    .sets
                    .entry(key.clone())
                    .or_default()
                    .insert(member.clone(), ())
                    .is_none();
                BatchReply::Int(added as i64)
            }
            StoreCommand::SetRemove { key, member } => {
                let removed = self
                    .sets
                    .get_mut(key)
                    .map(|s| s.remove(member).is_some())
                    .unwrap_or(false);
                BatchReply::Int(removed as i64)
            }
            StoreCommand::SortedSetAdd { key, score, member } => {
                let added = self
                    .sorted_sets
                    .entry(key.clone())
                    .or_default()
                    .insert(member.clone(), *score)
                    .is_none();
                BatchReply::Int(added as i64)
            }
            StoreCommand::HashSet { key, field, value } => {
                let created = self
                    .hashes
                    .entry(key.clone())
                    .or_default()
                    .insert(field.clone(), value.clone())
                    .is_none();
                BatchReply::Int(created as i64)
            }
            StoreCommand::HashSetIfAbsent { key, field, value } => {
                let hash = self.hashes.entry(key.clone()).or_default();
                if hash.contains_key(field) {
                    BatchReply::Int(0)
                } else {
                    hash.insert(field.clone(), value.clone());
                    BatchReply::Int(1)
                }
            }
            StoreCommand::HashIncrBy { key, field, amount } => {
                let hash = self.hashes.entry(key.clone()).or_default();
                let current: i64 = hash
                    .get(field)
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                let next = current + amount;
                hash.insert(field.clone(), next.to_string());
                BatchReply::Int(next)
            }
            StoreCommand::RenameKey { old, new } => {
                if let Some(hash) = self.hashes.remove(old) {
                    self.hashes.insert(new.clone(), hash);
                }
                if let Some(set) = self.sets.remove(old) {
                    self.sets.insert(new.clone(), set);
                }
                if let Some(zset) = self.sorted_sets.remove(old) {
                    self.sorted_sets.insert(new.clone(), zset);
                }
                BatchReply::Ok
            }
        }
    }
}

/// An in-memory [`CommandExecutor`] double.
///
/// Cheap to clone; clones share state, so a test can hold an inspection
/// handle while the code under test owns another. Uses the empty
/// connection namespace, so keys are stored exactly as callers pass them.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

fn injected_failure() -> RedqError {
    RedqError::connection(std::io::Error::other("injected store failure"))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value the next `read_clock` calls will return.
    pub async fn set_clock(&self, time: StoreTime) {
        self.inner.lock().await.clock = Some(time);
    }

    /// Makes the next immediate call (field or clock read) fail with a
    /// connection error.
    pub async fn fail_next_call(&self) {
        self.inner.lock().await.fail_next_call = true;
    }

    /// Makes the next transaction commit fail with a connection error,
    /// applying none of its commands.
    pub async fn fail_next_commit(&self) {
        self.inner.lock().await.fail_next_commit = true;
    }

    // --- inspection ---

    pub async fn hash_field(&self, key: &str, field: &str) -> Option<String> {
        self.inner
            .lock()
            .await
            .hashes
            .get(key)
            .and_then(|h| h.get(field).cloned())
    }

    pub async fn sorted_set_score(&self, key: &str, member: &str) -> Option<i64> {
        self.inner
            .lock()
            .await
            .sorted_sets
            .get(key)
            .and_then(|z| z.get(member).copied())
    }

    pub async fn set_members(&self, key: &str) -> Vec<String> {
        self.inner
            .lock()
            .await
            .sets
            .get(key)
            .map(|s| s.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// All committed batches, oldest first, as their command lists.
    pub async fn committed_batches(&self) -> Vec<Vec<StoreCommand>> {
        self.inner.lock().await.committed.clone()
    }

    /// Recorded `read_hash_fields` calls as `(key, fields)`.
    pub async fn field_reads(&self) -> Vec<(String, Vec<String>)> {
        self.inner.lock().await.field_reads.clone()
    }

    /// Total store interactions: immediate reads, clock reads, and commits.
    pub async fn call_count(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.field_reads.len() + inner.clock_reads + inner.committed.len()
    }

    /// Seeds a hash field directly, bypassing recording. For arranging
    /// pre-existing store state in tests.
    pub async fn seed_hash_field(&self, key: &str, field: &str, value: &str) {
        self.inner
            .lock()
            .await
            .hashes
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
    }
}

#[async_trait]
impl CommandExecutor for MemoryStore {
    async fn read_hash_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<Vec<Option<String>>, RedqError> {
        let mut inner = self.inner.lock().await;
        if std::mem::take(&mut inner.fail_next_call) {
            return Err(injected_failure());
        }
        inner.field_reads.push((
            key.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        ));
        let hash = inner.hashes.get(key);
        Ok(fields
            .iter()
            .map(|f| hash.and_then(|h| h.get(*f).cloned()))
            .collect())
    }

    async fn read_clock(&self) -> Result<StoreTime, RedqError> {
        let mut inner = self.inner.lock().await;
        if std::mem::take(&mut inner.fail_next_call) {
            return Err(injected_failure());
        }
        inner.clock_reads += 1;
        Ok(inner.clock.unwrap_or(StoreTime::new(1_000_000_000, 0)))
    }

    async fn execute(&self, batch: CommandBatch) -> Result<Vec<BatchReply>, RedqError> {
        let mut inner = self.inner.lock().await;
        if std::mem::take(&mut inner.fail_next_commit) {
            return Err(injected_failure());
        }
        let commands = batch.into_commands();
        let replies = commands.iter().map(|c| inner.apply(c)).collect();
        inner.committed.push(commands);
        Ok(replies)
    }
}
