// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue synchronization and the atomic enqueue protocol.
//!
//! A [`Queue`] is obtained by reconciling a desired [`QueueConfig`]
//! against the store: absent metadata is created with conditional sets
//! (detecting creation races), divergent metadata is reconciled in one
//! transaction, and matching metadata costs zero writes. Every write that
//! must be consistent as a group goes through one command batch.

use std::sync::Arc;

use tracing::debug;

use redq_core::batch::CommandBatch;
use redq_core::error::RedqError;
use redq_core::ident;
use redq_core::traits::{CommandExecutor, QueueMessage};
use redq_core::types::{
    FIELD_CREATED, FIELD_DELAY, FIELD_MAX_MESSAGE_SIZE, FIELD_MODIFIED, FIELD_TOTAL_SENT,
    FIELD_VISIBILITY_TIMEOUT, QueueConfig, REGISTRY_KEY,
};

/// Number of conditional sets queued by the creation transaction. Their
/// reply slots come first and are the ones inspected for a race.
const CREATE_CONDITIONAL_SETS: usize = 5;

/// A handle to one synchronized queue.
///
/// The held [`QueueConfig`] is authoritative as of the last successful
/// synchronization; it is superseded whenever reconciliation succeeds.
pub struct Queue {
    executor: Arc<dyn CommandExecutor>,
    config: QueueConfig,
}

impl std::fmt::Debug for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Queue {
    /// Acquires the queue named by `desired`, reconciling remote state.
    ///
    /// Reads the persisted configuration in one call. When all fields are
    /// absent the queue is created atomically; when present but divergent
    /// the persisted configuration is moved to `desired` via
    /// [`reconfigure`](Self::reconfigure); when present and identical no
    /// write is issued at all.
    ///
    /// # Errors
    ///
    /// [`RedqError::CreateConflict`] when first-time creation races with a
    /// concurrent creator, [`RedqError::CorruptConfig`] when only part of
    /// the persisted configuration exists or a field fails to parse, and
    /// [`RedqError::Connection`] on transport failure.
    pub async fn open(
        executor: Arc<dyn CommandExecutor>,
        desired: QueueConfig,
    ) -> Result<Self, RedqError> {
        let fields = executor
            .read_hash_fields(
                &desired.key(),
                &[FIELD_VISIBILITY_TIMEOUT, FIELD_DELAY, FIELD_MAX_MESSAGE_SIZE],
            )
            .await?;
        let present = fields.iter().flatten().count();

        if present == 0 {
            Self::create(&executor, &desired).await?;
            return Ok(Self {
                executor,
                config: desired,
            });
        }
        if present < fields.len() {
            return Err(RedqError::CorruptConfig {
                queue: desired.name().to_string(),
                detail: "only part of the persisted configuration exists".into(),
            });
        }

        let persisted = parse_persisted(&desired, &fields)?;
        let mut queue = Self {
            executor,
            config: persisted,
        };
        if !queue.config.same_attributes(&desired) {
            queue.reconfigure(desired).await?;
        } else {
            debug!(queue = %desired.name(), "queue already in sync");
            queue.config = desired;
        }
        Ok(queue)
    }

    /// The authoritative configuration of this queue.
    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Creates the queue with conditional sets so a concurrent creator is
    /// detected instead of silently overwritten.
    async fn create(
        executor: &Arc<dyn CommandExecutor>,
        config: &QueueConfig,
    ) -> Result<(), RedqError> {
        let time = executor.read_clock().await?;
        let key = config.key();
        let mut batch = CommandBatch::new();
        batch
            .hash_set_if_absent(
                &key,
                FIELD_VISIBILITY_TIMEOUT,
                config.visibility_timeout().to_string(),
            )
            .hash_set_if_absent(&key, FIELD_DELAY, config.delay().to_string())
            .hash_set_if_absent(&key, FIELD_MAX_MESSAGE_SIZE, config.max_size().to_string())
            .hash_set_if_absent(&key, FIELD_CREATED, time.seconds.to_string())
            .hash_set_if_absent(&key, FIELD_MODIFIED, time.seconds.to_string())
            .set_add(REGISTRY_KEY, config.name());
        let replies = executor.execute(batch).await?;

        let raced = replies
            .iter()
            .take(CREATE_CONDITIONAL_SETS)
            .any(|reply| reply.as_int() == Some(0));
        if raced {
            return Err(RedqError::CreateConflict {
                queue: config.name().to_string(),
            });
        }
        debug!(queue = %config.name(), "created queue");
        Ok(())
    }

    /// Moves the queue from its current configuration to `desired` in one
    /// transaction.
    ///
    /// Each tunable that differs becomes exactly one hash write. A name
    /// change renames the metadata key first and the delivery index
    /// second (both stay addressable by their pre-rename names inside the
    /// transaction) and swaps the registry entry. A no-op diff succeeds
    /// without touching the store. On success `desired` becomes the
    /// authoritative configuration.
    pub async fn reconfigure(&mut self, desired: QueueConfig) -> Result<(), RedqError> {
        let old = &self.config;
        let key = old.key();
        let mut batch = CommandBatch::new();
        if old.visibility_timeout() != desired.visibility_timeout() {
            batch.hash_set(
                &key,
                FIELD_VISIBILITY_TIMEOUT,
                desired.visibility_timeout().to_string(),
            );
        }
        if old.delay() != desired.delay() {
            batch.hash_set(&key, FIELD_DELAY, desired.delay().to_string());
        }
        if old.max_size() != desired.max_size() {
            batch.hash_set(&key, FIELD_MAX_MESSAGE_SIZE, desired.max_size().to_string());
        }
        if old.name() != desired.name() {
            batch
                .rename_key(&key, desired.key())
                .rename_key(old.name(), desired.name())
                .set_remove(REGISTRY_KEY, old.name())
                .set_add(REGISTRY_KEY, desired.name());
        }

        if !batch.is_empty() {
            debug!(
                queue = %old.name(),
                new_name = %desired.name(),
                writes = batch.len(),
                "reconfiguring queue"
            );
            self.executor.execute(batch).await?;
        }
        self.config = desired;
        Ok(())
    }

    /// Enqueues a message, assigning it a unique time-ordered identifier.
    ///
    /// The delivery time is the store clock truncated to milliseconds plus
    /// the effective delay (the message's own override, else the queue
    /// default). Index entry, message body, and the send counter are
    /// committed as one transaction. Returns the generated identifier.
    pub async fn send_message(&self, message: &dyn QueueMessage) -> Result<String, RedqError> {
        self.validate_message(message)?;

        let time = self.executor.read_clock().await?;
        let id = ident::generate(time);
        let delay = message.delay().unwrap_or(self.config.delay());
        let score = time.millis() + delay as i64 * 1000;
        let key = self.config.key();

        let mut batch = CommandBatch::new();
        batch
            .sorted_set_add(self.config.name(), score, &id)
            .hash_set(&key, &id, message.body())
            .hash_incr_by(&key, FIELD_TOTAL_SENT, 1);
        self.executor.execute(batch).await?;

        debug!(queue = %self.config.name(), id = %id, score, "message enqueued");
        Ok(id)
    }

    /// Local pre-flight checks; must pass before any store access.
    fn validate_message(&self, message: &dyn QueueMessage) -> Result<(), RedqError> {
        let max_size = self.config.max_size();
        if max_size != QueueConfig::UNLIMITED_SIZE && message.body().len() > max_size as usize {
            return Err(RedqError::MessageTooLong {
                size: message.body().len(),
                max_size,
            });
        }
        Ok(())
    }
}

/// Builds the currently-persisted configuration from the fields read
/// during synchronization. Any malformed value is a queue-domain error,
/// not a validation error: the caller's input was fine, the store's
/// contents are not.
fn parse_persisted(
    desired: &QueueConfig,
    fields: &[Option<String>],
) -> Result<QueueConfig, RedqError> {
    let corrupt = |detail: String| RedqError::CorruptConfig {
        queue: desired.name().to_string(),
        detail,
    };
    let parse = |index: usize, field: &str| -> Result<i64, RedqError> {
        fields[index]
            .as_deref()
            .ok_or_else(|| corrupt(format!("{field} is missing")))?
            .parse()
            .map_err(|_| corrupt(format!("{field} is not an integer")))
    };
    let vt = parse(0, FIELD_VISIBILITY_TIMEOUT)?;
    let delay = parse(1, FIELD_DELAY)?;
    let max_size = parse(2, FIELD_MAX_MESSAGE_SIZE)?;
    QueueConfig::new(
        desired.name(),
        u32::try_from(vt).map_err(|_| corrupt(format!("{FIELD_VISIBILITY_TIMEOUT} is negative")))?,
        u32::try_from(delay).map_err(|_| corrupt(format!("{FIELD_DELAY} is negative")))?,
        i32::try_from(max_size).map_err(|_| corrupt(format!("{FIELD_MAX_MESSAGE_SIZE} overflows")))?,
    )
    .map_err(|e| corrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use redq_core::batch::StoreCommand;
    use redq_core::message::TextMessage;
    use redq_core::types::StoreTime;
    use redq_test_utils::MemoryStore;

    fn executor(store: &MemoryStore) -> Arc<dyn CommandExecutor> {
        Arc::new(store.clone())
    }

    #[tokio::test]
    async fn fresh_queue_is_created_in_one_transaction() {
        let store = MemoryStore::new();
        store.set_clock(StoreTime::new(1_700_000_000, 0)).await;
        let config = QueueConfig::new("orders", 30, 0, 65536).unwrap();
        let queue = Queue::open(executor(&store), config).await.unwrap();
        assert_eq!(queue.config().name(), "orders");

        let batches = store.committed_batches().await;
        assert_eq!(batches.len(), 1, "exactly one creation transaction");
        assert_eq!(batches[0].len(), 6);
        let registry_adds = batches[0]
            .iter()
            .filter(|c| {
                matches!(c, StoreCommand::SetAdd { key, member }
                    if key == "QUEUES" && member == "orders")
            })
            .count();
        assert_eq!(registry_adds, 1, "exactly one registry addition");
        assert_eq!(
            store.hash_field("orders:Q", "visibilityTimeout").await.as_deref(),
            Some("30")
        );
        assert_eq!(
            store.hash_field("orders:Q", "created").await.as_deref(),
            Some("1700000000")
        );
        assert_eq!(store.set_members("QUEUES").await, vec!["orders"]);
    }

    #[tokio::test]
    async fn matching_queue_costs_zero_writes() {
        let store = MemoryStore::new();
        let config = QueueConfig::new("orders", 30, 0, 65536).unwrap();
        Queue::open(executor(&store), config.clone()).await.unwrap();
        let writes_after_create = store.committed_batches().await.len();

        Queue::open(executor(&store), config).await.unwrap();
        assert_eq!(
            store.committed_batches().await.len(),
            writes_after_create,
            "identical re-acquire must not write"
        );
    }

    #[tokio::test]
    async fn divergent_delay_reconciles_with_a_single_hash_set() {
        let store = MemoryStore::new();
        Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 65536).unwrap(),
        )
        .await
        .unwrap();

        let queue = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 120, 65536).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(queue.config().delay(), 120);

        let batches = store.committed_batches().await;
        let reconcile = batches.last().unwrap();
        assert_eq!(
            reconcile,
            &vec![StoreCommand::HashSet {
                key: "orders:Q".into(),
                field: "delay".into(),
                value: "120".into(),
            }]
        );
        assert_eq!(store.hash_field("orders:Q", "delay").await.as_deref(), Some("120"));
    }

    #[tokio::test]
    async fn rename_moves_both_keys_and_swaps_the_registry() {
        let store = MemoryStore::new();
        let mut queue = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 65536).unwrap(),
        )
        .await
        .unwrap();

        queue
            .reconfigure(QueueConfig::new("invoices", 30, 0, 65536).unwrap())
            .await
            .unwrap();

        let batches = store.committed_batches().await;
        assert_eq!(
            batches.last().unwrap(),
            &vec![
                StoreCommand::RenameKey {
                    old: "orders:Q".into(),
                    new: "invoices:Q".into(),
                },
                StoreCommand::RenameKey {
                    old: "orders".into(),
                    new: "invoices".into(),
                },
                StoreCommand::SetRemove {
                    key: "QUEUES".into(),
                    member: "orders".into(),
                },
                StoreCommand::SetAdd {
                    key: "QUEUES".into(),
                    member: "invoices".into(),
                },
            ]
        );
        assert_eq!(store.set_members("QUEUES").await, vec!["invoices"]);
        assert_eq!(
            store.hash_field("invoices:Q", "visibilityTimeout").await.as_deref(),
            Some("30")
        );
        assert_eq!(queue.config().key(), "invoices:Q");
    }

    #[tokio::test]
    async fn creation_race_surfaces_a_conflict() {
        let store = MemoryStore::new();
        // A concurrent creator already stamped `created`; the tunables are
        // still absent so the checking phase sees a missing queue.
        store.seed_hash_field("orders:Q", "created", "1700000000").await;
        let err = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 65536).unwrap(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RedqError::CreateConflict { queue } if queue == "orders"));
    }

    #[tokio::test]
    async fn partial_metadata_is_corrupt_not_recreated() {
        let store = MemoryStore::new();
        store.seed_hash_field("orders:Q", "delay", "0").await;
        let err = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 65536).unwrap(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RedqError::CorruptConfig { .. }));
        // Nothing was written while diagnosing.
        assert!(store.committed_batches().await.is_empty());
    }

    #[tokio::test]
    async fn unparsable_metadata_is_corrupt() {
        let store = MemoryStore::new();
        store.seed_hash_field("orders:Q", "visibilityTimeout", "30").await;
        store.seed_hash_field("orders:Q", "delay", "soon").await;
        store.seed_hash_field("orders:Q", "maxMessageSize", "65536").await;
        let err = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 65536).unwrap(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RedqError::CorruptConfig { .. }));
    }

    #[tokio::test]
    async fn oversize_message_fails_before_any_store_call() {
        let store = MemoryStore::new();
        let queue = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 1024).unwrap(),
        )
        .await
        .unwrap();
        let calls_before = store.call_count().await;

        let message = TextMessage::new("x".repeat(2048), None).unwrap();
        let err = queue.send_message(&message).await.unwrap_err();
        assert!(matches!(
            err,
            RedqError::MessageTooLong {
                size: 2048,
                max_size: 1024,
            }
        ));
        assert_eq!(store.call_count().await, calls_before, "no store access");
    }

    #[tokio::test]
    async fn unlimited_size_skips_the_length_check() {
        let store = MemoryStore::new();
        let queue = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, -1).unwrap(),
        )
        .await
        .unwrap();
        let message = TextMessage::new("x".repeat(100_000), None).unwrap();
        assert!(queue.send_message(&message).await.is_ok());
    }

    #[tokio::test]
    async fn message_delay_overrides_the_queue_default() {
        let store = MemoryStore::new();
        store.set_clock(StoreTime::new(1_700_000_000, 0)).await;
        let queue = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 60, 65536).unwrap(),
        )
        .await
        .unwrap();

        let defaulted = TextMessage::new("a", None).unwrap();
        let id_a = queue.send_message(&defaulted).await.unwrap();
        assert_eq!(
            store.sorted_set_score("orders", &id_a).await,
            Some(1_700_000_000_000 + 60 * 1000)
        );

        let overridden = TextMessage::new("b", Some(5)).unwrap();
        let id_b = queue.send_message(&overridden).await.unwrap();
        assert_eq!(
            store.sorted_set_score("orders", &id_b).await,
            Some(1_700_000_000_000 + 5 * 1000)
        );
    }

    #[tokio::test]
    async fn failed_send_leaves_no_partial_state() {
        let store = MemoryStore::new();
        let queue = Queue::open(
            executor(&store),
            QueueConfig::new("orders", 30, 0, 65536).unwrap(),
        )
        .await
        .unwrap();

        store.fail_next_commit().await;
        let message = TextMessage::new("order-42", None).unwrap();
        let err = queue.send_message(&message).await.unwrap_err();
        assert!(matches!(err, RedqError::Connection { .. }));
        assert_eq!(store.hash_field("orders:Q", "totalsent").await, None);
    }
}
