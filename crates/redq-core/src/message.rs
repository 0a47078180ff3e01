// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message variants accepted by the enqueue operation.
//!
//! Both variants validate on construction and are immutable afterwards:
//! once handed to a queue they become store records as-is.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::RedqError;
use crate::traits::QueueMessage;
use crate::types::check_message_delay;

/// A plain-text message.
#[derive(Debug, Clone)]
pub struct TextMessage {
    body: String,
    delay: Option<u32>,
}

impl TextMessage {
    /// Creates a text message. The body is trimmed and must not be empty;
    /// the delay override, when present, must be within 0-9999999 seconds.
    pub fn new(body: impl Into<String>, delay: Option<u32>) -> Result<Self, RedqError> {
        let body = body.into().trim().to_string();
        if body.is_empty() {
            return Err(RedqError::EmptyMessage);
        }
        Ok(Self {
            body,
            delay: check_message_delay(delay)?,
        })
    }
}

impl QueueMessage for TextMessage {
    fn body(&self) -> &str {
        &self.body
    }

    fn delay(&self) -> Option<u32> {
        self.delay
    }
}

/// A message carrying a JSON-encoded payload.
#[derive(Debug, Clone)]
pub struct JsonMessage {
    body: String,
    delay: Option<u32>,
}

impl JsonMessage {
    /// Encodes `payload` as the message body.
    pub fn from_payload<T: Serialize>(payload: &T, delay: Option<u32>) -> Result<Self, RedqError> {
        let body = serde_json::to_string(payload).map_err(|e| RedqError::MessageEncoding {
            detail: e.to_string(),
        })?;
        if body == "null" {
            return Err(RedqError::EmptyMessage);
        }
        Ok(Self {
            body,
            delay: check_message_delay(delay)?,
        })
    }

    /// Accepts an already-encoded JSON body, verifying it parses to a
    /// non-null value.
    pub fn from_string(raw: impl Into<String>, delay: Option<u32>) -> Result<Self, RedqError> {
        let body = raw.into().trim().to_string();
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| RedqError::MessageEncoding {
                detail: e.to_string(),
            })?;
        if value.is_null() {
            return Err(RedqError::EmptyMessage);
        }
        Ok(Self {
            body,
            delay: check_message_delay(delay)?,
        })
    }

    /// Decodes the payload back out of the body.
    pub fn payload<T: DeserializeOwned>(&self) -> Result<T, RedqError> {
        serde_json::from_str(&self.body).map_err(|e| RedqError::MessageEncoding {
            detail: e.to_string(),
        })
    }
}

impl QueueMessage for JsonMessage {
    fn body(&self) -> &str {
        &self.body
    }

    fn delay(&self) -> Option<u32> {
        self.delay
    }
}
