// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability provided by enqueueable payload types.

/// A validated message body plus an optional per-message delay override.
///
/// Implementors guarantee the body is non-empty by construction and that
/// the delay, when present, is within the queue interval range. Messages
/// are immutable once constructed; the queue only ever handles the string
/// form of the body.
pub trait QueueMessage {
    /// The string form of the message body.
    fn body(&self) -> &str;

    /// Per-message delay override in seconds, if any. `None` defers to the
    /// queue's default delay.
    fn delay(&self) -> Option<u32>;
}
