// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions at the redq seams.
//!
//! [`CommandExecutor`] is the entire boundary the client core needs from
//! the store transport; [`QueueMessage`] is the capability a payload type
//! provides to be enqueued.

pub mod executor;
pub mod message;

pub use executor::CommandExecutor;
pub use message::QueueMessage;
