// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value objects shared across the redq workspace.

use crate::error::RedqError;

/// Registry set holding the names of all known queues.
pub const REGISTRY_KEY: &str = "QUEUES";

/// Metadata hash field: visibility timeout in seconds.
pub const FIELD_VISIBILITY_TIMEOUT: &str = "visibilityTimeout";
/// Metadata hash field: default message delay in seconds.
pub const FIELD_DELAY: &str = "delay";
/// Metadata hash field: maximum message size in bytes (or -1).
pub const FIELD_MAX_MESSAGE_SIZE: &str = "maxMessageSize";
/// Metadata hash field: creation time, unix seconds from the store clock.
pub const FIELD_CREATED: &str = "created";
/// Metadata hash field: last modification time, unix seconds.
pub const FIELD_MODIFIED: &str = "modified";
/// Metadata hash field: monotonically incremented send counter.
pub const FIELD_TOTAL_SENT: &str = "totalsent";

/// Upper bound for visibility timeout and delay values, in seconds.
pub const MAX_INTERVAL_SECS: u32 = 9_999_999;

/// A clock reading from the backing store: `(seconds, microseconds)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreTime {
    /// Unix seconds.
    pub seconds: u64,
    /// Microsecond fraction, `0..1_000_000`.
    pub micros: u32,
}

impl StoreTime {
    pub fn new(seconds: u64, micros: u32) -> Self {
        Self { seconds, micros }
    }

    /// Milliseconds since epoch, derived by truncating the microsecond
    /// fraction (never rounding).
    pub fn millis(&self) -> i64 {
        self.seconds as i64 * 1000 + (self.micros / 1000) as i64
    }
}

/// Returns true when `s` consists only of `[A-Za-z0-9_-]`.
pub fn is_valid_charset(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_interval(field: &'static str, value: u32) -> Result<u32, RedqError> {
    if value > MAX_INTERVAL_SECS {
        return Err(RedqError::OutOfRange {
            field,
            got: value as i64,
            allowed: "0..=9999999",
        });
    }
    Ok(value)
}

/// Immutable configuration of one queue.
///
/// Constructed by the caller as desired state, compared against persisted
/// state during synchronization, and superseded whenever reconciliation
/// succeeds. The storage key is always derived from the name; the two are
/// never stored independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    name: String,
    visibility_timeout: u32,
    delay: u32,
    max_size: i32,
}

impl QueueConfig {
    /// Default visibility timeout in seconds.
    pub const DEFAULT_VISIBILITY_TIMEOUT: u32 = 30;
    /// Default message delay in seconds.
    pub const DEFAULT_DELAY: u32 = 0;
    /// Default maximum message size in bytes.
    pub const DEFAULT_MAX_SIZE: i32 = 65536;
    /// Sentinel for an unbounded message size.
    pub const UNLIMITED_SIZE: i32 = -1;

    /// Creates a validated queue configuration.
    ///
    /// `name` allows 1-160 characters of `[A-Za-z0-9_-]` (surrounding
    /// whitespace is trimmed). `visibility_timeout` and `delay` allow
    /// 0-9999999 seconds. `max_size` allows 1024-65536 bytes or the
    /// [`UNLIMITED_SIZE`](Self::UNLIMITED_SIZE) sentinel.
    pub fn new(
        name: impl Into<String>,
        visibility_timeout: u32,
        delay: u32,
        max_size: i32,
    ) -> Result<Self, RedqError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(RedqError::InvalidName {
                name,
                detail: "queue name must not be empty".into(),
            });
        }
        if name.len() > 160 {
            return Err(RedqError::InvalidName {
                name,
                detail: "queue name exceeds 160 characters".into(),
            });
        }
        if !is_valid_charset(&name) {
            return Err(RedqError::InvalidName {
                name,
                detail: "allowed characters are alphanumerics, hyphens and underscores".into(),
            });
        }
        if max_size != Self::UNLIMITED_SIZE && !(1024..=65536).contains(&max_size) {
            return Err(RedqError::OutOfRange {
                field: "maxMessageSize",
                got: max_size as i64,
                allowed: "-1 or 1024..=65536",
            });
        }
        Ok(Self {
            name,
            visibility_timeout: check_interval("visibilityTimeout", visibility_timeout)?,
            delay: check_interval("delay", delay)?,
            max_size,
        })
    }

    /// Creates a configuration with the default tunables.
    pub fn with_defaults(name: impl Into<String>) -> Result<Self, RedqError> {
        Self::new(
            name,
            Self::DEFAULT_VISIBILITY_TIMEOUT,
            Self::DEFAULT_DELAY,
            Self::DEFAULT_MAX_SIZE,
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage key of the queue metadata hash, derived from the name.
    pub fn key(&self) -> String {
        format!("{}:Q", self.name)
    }

    pub fn visibility_timeout(&self) -> u32 {
        self.visibility_timeout
    }

    pub fn delay(&self) -> u32 {
        self.delay
    }

    pub fn max_size(&self) -> i32 {
        self.max_size
    }

    /// True when the three tunables (not the name) match `other`.
    pub fn same_attributes(&self, other: &QueueConfig) -> bool {
        self.visibility_timeout == other.visibility_timeout
            && self.delay == other.delay
            && self.max_size == other.max_size
    }
}

/// Validates a message delay override against the shared interval range.
pub(crate) fn check_message_delay(delay: Option<u32>) -> Result<Option<u32>, RedqError> {
    match delay {
        Some(d) => Ok(Some(check_interval("delay", d)?)),
        None => Ok(None),
    }
}
