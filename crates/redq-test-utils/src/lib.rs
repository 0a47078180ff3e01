// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the redq workspace.
//!
//! `MemoryStore` implements `CommandExecutor` over in-memory state with a
//! programmable clock, failure injection, and full call recording,
//! enabling fast, CI-runnable tests without a Redis server.

pub mod memory_store;

pub use memory_store::MemoryStore;
