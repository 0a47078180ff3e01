// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the redq message queue client.
//!
//! This crate provides the trait definitions, error type, value objects,
//! identifier generation, and the typed command-batch model used
//! throughout the redq workspace. Store backends implement
//! [`CommandExecutor`]; payload types implement [`QueueMessage`].

pub mod batch;
pub mod error;
pub mod ident;
pub mod message;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use batch::{BatchReply, CommandBatch, StoreCommand};
pub use error::{ErrorKind, RedqError};
pub use message::{JsonMessage, TextMessage};
pub use traits::{CommandExecutor, QueueMessage};
pub use types::{QueueConfig, StoreTime};
