// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end queue lifecycle against the in-memory store double.

use std::sync::Arc;

use redq::{Queue, QueueConfig, QueueSession, RedqError, StoreTime, TextMessage};
use redq_test_utils::MemoryStore;

#[tokio::test]
async fn fresh_queue_enqueue_end_to_end() {
    let store = MemoryStore::new();
    store.set_clock(StoreTime::new(1_519_053_999, 494_416)).await;

    let config = QueueConfig::new("orders", 30, 0, 65536).unwrap();
    let queue = Queue::open(Arc::new(store.clone()), config).await.unwrap();

    let message = TextMessage::new("order-42", None).unwrap();
    let id = queue.send_message(&message).await.unwrap();

    // Delivery score: seconds * 1000 plus the first three digits of the
    // zero-padded microsecond field (494416 -> 494), truncated.
    assert_eq!(
        store.sorted_set_score("orders", &id).await,
        Some(1_519_053_999 * 1000 + 494)
    );
    // The body is a metadata-hash field keyed by the identifier.
    assert_eq!(
        store.hash_field("orders:Q", &id).await.as_deref(),
        Some("order-42")
    );
    // The send counter went from unset to 1.
    assert_eq!(
        store.hash_field("orders:Q", "totalsent").await.as_deref(),
        Some("1")
    );
    // The identifier prefix is the base-36 form of the clock reading.
    assert!(id.starts_with("eygjruhj4g"));
    assert_eq!(id.len(), "eygjruhj4g".len() + 22);
}

#[tokio::test]
async fn two_sessions_share_one_queue() {
    let store = MemoryStore::new();

    let mut first = QueueSession::new(Arc::new(store.clone()));
    first.send_text("orders", "one").await.unwrap();

    // A second session acquiring with identical tunables reads, matches,
    // and writes nothing new to the configuration.
    let mut second = QueueSession::new(Arc::new(store.clone()));
    second.send_text("orders", "two").await.unwrap();

    assert_eq!(
        store.hash_field("orders:Q", "totalsent").await.as_deref(),
        Some("2")
    );
    assert_eq!(store.set_members("QUEUES").await, vec!["orders"]);
}

#[tokio::test]
async fn reconfigure_then_enqueue_uses_the_new_name() {
    let store = MemoryStore::new();
    let mut queue = Queue::open(
        Arc::new(store.clone()),
        QueueConfig::new("orders", 30, 0, 65536).unwrap(),
    )
    .await
    .unwrap();

    queue
        .reconfigure(QueueConfig::new("invoices", 30, 0, 65536).unwrap())
        .await
        .unwrap();

    let id = queue
        .send_message(&TextMessage::new("order-42", None).unwrap())
        .await
        .unwrap();
    assert!(store.sorted_set_score("invoices", &id).await.is_some());
    assert_eq!(
        store.hash_field("invoices:Q", &id).await.as_deref(),
        Some("order-42")
    );
}

#[tokio::test]
async fn transport_failure_during_sync_is_a_connection_error() {
    let store = MemoryStore::new();
    store.fail_next_call().await;
    let err = Queue::open(
        Arc::new(store.clone()),
        QueueConfig::new("orders", 30, 0, 65536).unwrap(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RedqError::Connection { .. }));
    assert!(store.committed_batches().await.is_empty());
}
