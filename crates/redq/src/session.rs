// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller-facing session owning acquired queues.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use redq_core::error::RedqError;
use redq_core::message::{JsonMessage, TextMessage};
use redq_core::traits::CommandExecutor;
use redq_core::types::QueueConfig;

use crate::queue::Queue;

/// A session over one store connection.
///
/// Acquired queues are memoized by name in an explicit cache whose
/// lifetime equals the session: dropping the session drops every handle.
/// Re-acquiring a cached queue with different tunables reconfigures it in
/// place instead of re-running the full synchronization.
pub struct QueueSession {
    executor: Arc<dyn CommandExecutor>,
    queues: HashMap<String, Queue>,
}

impl QueueSession {
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            queues: HashMap::new(),
        }
    }

    /// Acquires the queue described by `desired`, synchronizing it with
    /// the store on first use within this session.
    pub async fn queue(&mut self, desired: QueueConfig) -> Result<&mut Queue, RedqError> {
        let name = desired.name().to_string();
        match self.queues.entry(name) {
            Entry::Occupied(entry) => {
                let queue = entry.into_mut();
                if !queue.config().same_attributes(&desired) {
                    queue.reconfigure(desired).await?;
                }
                Ok(queue)
            }
            Entry::Vacant(entry) => {
                debug!(queue = %desired.name(), "acquiring queue");
                let queue = Queue::open(self.executor.clone(), desired).await?;
                Ok(entry.insert(queue))
            }
        }
    }

    /// Sends a plain-text message to the named queue, creating the queue
    /// with default tunables when it does not exist yet.
    pub async fn send_text(
        &mut self,
        queue_name: &str,
        body: impl Into<String>,
    ) -> Result<String, RedqError> {
        let message = TextMessage::new(body, None)?;
        let config = QueueConfig::with_defaults(queue_name)?;
        self.queue(config).await?.send_message(&message).await
    }

    /// Sends a JSON-encoded payload to the named queue, creating the
    /// queue with default tunables when it does not exist yet.
    pub async fn send_json<T: Serialize>(
        &mut self,
        queue_name: &str,
        payload: &T,
    ) -> Result<String, RedqError> {
        let message = JsonMessage::from_payload(payload, None)?;
        let config = QueueConfig::with_defaults(queue_name)?;
        self.queue(config).await?.send_message(&message).await
    }
}
