// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the redq message queue client.

use thiserror::Error;

/// The primary error type used across all redq crates.
///
/// Every variant belongs to one of three categories (see [`ErrorKind`]):
/// validation failures detected client-side before any store access,
/// connection failures from the store transport, and queue-domain failures
/// detected from store results.
#[derive(Debug, Error)]
pub enum RedqError {
    /// Queue or namespace name is empty, too long, or uses characters
    /// outside `[A-Za-z0-9_-]`.
    #[error("invalid name `{name}`: {detail}")]
    InvalidName { name: String, detail: String },

    /// A numeric configuration value or message delay is outside its
    /// allowed range.
    #[error("{field} out of range: got {got}, allowed {allowed}")]
    OutOfRange {
        field: &'static str,
        got: i64,
        allowed: &'static str,
    },

    /// Message body is empty after trimming.
    #[error("message body is empty")]
    EmptyMessage,

    /// Message body exceeds the queue's configured maximum size.
    #[error("message is {size} bytes but the queue allows at most {max_size}")]
    MessageTooLong { size: usize, max_size: i32 },

    /// Message payload could not be encoded or decoded.
    #[error("message encoding error: {detail}")]
    MessageEncoding { detail: String },

    /// Store transport failure during an immediate call or a transaction
    /// commit. The in-flight operation is considered not to have happened.
    #[error("store connection error: {source}")]
    Connection {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// First-time creation raced with a concurrent creator; the other
    /// client owns the queue configuration.
    #[error("queue `{queue}` was created concurrently by another client")]
    CreateConflict { queue: String },

    /// Persisted queue metadata is malformed (a strict subset of the
    /// configuration fields exists, or a field failed to parse).
    #[error("queue `{queue}` has corrupt persisted configuration: {detail}")]
    CorruptConfig { queue: String, detail: String },
}

/// The three error categories of the redq failure taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected entirely client-side before any store access.
    Validation,
    /// Store transport failure; opaque, not retried by this layer.
    Connection,
    /// Domain-level failure detected from store results.
    Queue,
}

impl RedqError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            RedqError::InvalidName { .. }
            | RedqError::OutOfRange { .. }
            | RedqError::EmptyMessage
            | RedqError::MessageTooLong { .. }
            | RedqError::MessageEncoding { .. } => ErrorKind::Validation,
            RedqError::Connection { .. } => ErrorKind::Connection,
            RedqError::CreateConflict { .. } | RedqError::CorruptConfig { .. } => ErrorKind::Queue,
        }
    }

    /// Wraps a transport error into the connection category.
    pub fn connection<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RedqError::Connection {
            source: Box::new(source),
        }
    }
}
