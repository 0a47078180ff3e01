// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection configuration for the Redis executor.

use serde::{Deserialize, Serialize};

use redq_core::error::RedqError;
use redq_core::types::is_valid_charset;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    6379
}

fn default_namespace() -> String {
    "redq".to_string()
}

/// Connection settings for [`RedisExecutor`](crate::RedisExecutor).
///
/// Deserializable so consumers can embed it in their own configuration
/// files; every field has a default, so `RedisConfig::default()` points
/// at a local Redis with the standard namespace.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RedisConfig {
    /// Host name or IP address of the Redis server.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the Redis server.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix applied to every key this client touches, isolating one
    /// logical deployment from another within a shared server. Allowed
    /// are alphanumerics, hyphens and underscores; empty disables
    /// prefixing. Immutable once the connection is constructed.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Connect timeout in milliseconds; 0 waits indefinitely.
    #[serde(default)]
    pub connect_timeout_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            namespace: default_namespace(),
            connect_timeout_ms: 0,
        }
    }
}

impl RedisConfig {
    /// Validates semantic constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), RedqError> {
        if self.host.trim().is_empty() {
            return Err(RedqError::InvalidName {
                name: self.host.clone(),
                detail: "host must not be empty".into(),
            });
        }
        if !self.namespace.is_empty() && !is_valid_charset(&self.namespace) {
            return Err(RedqError::InvalidName {
                name: self.namespace.clone(),
                detail: "namespace allows alphanumerics, hyphens and underscores".into(),
            });
        }
        Ok(())
    }

    /// Connection URL understood by the redis client.
    pub fn url(&self) -> String {
        format!("redis://{}:{}/", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_a_local_server() {
        let config = RedisConfig::default();
        assert_eq!(config.url(), "redis://127.0.0.1:6379/");
        assert_eq!(config.namespace, "redq");
        assert_eq!(config.connect_timeout_ms, 0);
        config.validate().unwrap();
    }

    #[test]
    fn empty_namespace_is_allowed() {
        let config = RedisConfig {
            namespace: String::new(),
            ..Default::default()
        };
        config.validate().unwrap();
    }

    #[test]
    fn bad_namespace_is_rejected() {
        let config = RedisConfig {
            namespace: "my app".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RedqError::InvalidName { .. })
        ));
    }

    #[test]
    fn empty_host_is_rejected() {
        let config = RedisConfig {
            host: "  ".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RedqError::InvalidName { .. })
        ));
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: RedisConfig =
            serde_json::from_str(r#"{"host": "redis.internal", "namespace": "staging"}"#).unwrap();
        assert_eq!(config.host, "redis.internal");
        assert_eq!(config.port, 6379);
        assert_eq!(config.namespace, "staging");
    }
}
