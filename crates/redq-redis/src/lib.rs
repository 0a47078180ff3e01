// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis implementation of the redq `CommandExecutor` trait.
//!
//! Immediate reads go over a multiplexed tokio connection; command
//! batches are committed as MULTI/EXEC transactions via an atomic
//! pipeline. Every key is namespaced before it reaches the server.

pub mod config;
pub mod executor;

pub use config::RedisConfig;
pub use executor::RedisExecutor;
