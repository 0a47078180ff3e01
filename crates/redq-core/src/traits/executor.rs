// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The store command seam consumed by the queue client.

use async_trait::async_trait;

use crate::batch::{BatchReply, CommandBatch};
use crate::error::RedqError;
use crate::types::StoreTime;

/// Capability set the queue client requires from the backing store.
///
/// Implementations apply the connection namespace to every key they
/// receive; callers never namespace keys themselves. Any transport-level
/// failure surfaces as [`RedqError::Connection`], distinct from logical
/// per-command outcomes reported through reply slots.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Reads `fields` from the hash at `key` in one call.
    ///
    /// Absent fields (including the case where the hash itself does not
    /// exist) are reported as `None` in field order, never as an error.
    async fn read_hash_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<Vec<Option<String>>, RedqError>;

    /// Reads the store's clock.
    async fn read_clock(&self) -> Result<StoreTime, RedqError>;

    /// Commits all queued commands as one store transaction.
    ///
    /// Either every command applies or (on transport failure) none do;
    /// partial application within one batch is not possible. The returned
    /// sequence holds one reply per queued command, in queue order.
    async fn execute(&self, batch: CommandBatch) -> Result<Vec<BatchReply>, RedqError>;
}
