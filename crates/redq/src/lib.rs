// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A durable, delay-capable message queue client for Redis-style stores.
//!
//! The client coordinates several independent store objects per queue (a
//! metadata hash, a scored delivery index, and a global registry set)
//! that the store cannot update as one unit, using store-side
//! transactions plus conditional-write race detection. Wire a concrete
//! [`CommandExecutor`] (the `redq-redis` crate provides the Redis one)
//! into a [`QueueSession`] and send messages:
//!
//! ```no_run
//! # async fn example(executor: std::sync::Arc<dyn redq::CommandExecutor>) -> Result<(), redq::RedqError> {
//! use redq::{QueueConfig, QueueSession, TextMessage};
//!
//! let mut session = QueueSession::new(executor);
//! session.send_text("orders", "order-42").await?;
//!
//! let queue = session
//!     .queue(QueueConfig::new("orders", 30, 0, 65536)?)
//!     .await?;
//! queue.send_message(&TextMessage::new("order-43", Some(10))?).await?;
//! # Ok(())
//! # }
//! ```

pub mod queue;
pub mod session;

pub use queue::Queue;
pub use session::QueueSession;

// Re-export the core surface so most consumers depend on this crate alone.
pub use redq_core::{
    BatchReply, CommandBatch, CommandExecutor, ErrorKind, JsonMessage, QueueConfig, QueueMessage,
    RedqError, StoreCommand, StoreTime, TextMessage,
};
