// SPDX-FileCopyrightText: 2026 Redq Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Redis-backed [`CommandExecutor`].

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::{debug, trace};

use redq_core::batch::{BatchReply, CommandBatch, StoreCommand};
use redq_core::error::RedqError;
use redq_core::traits::CommandExecutor;
use redq_core::types::StoreTime;

use crate::config::RedisConfig;

/// Extends `key` with the connection namespace. An empty namespace
/// leaves keys untouched.
fn namespaced(namespace: &str, key: &str) -> String {
    if namespace.is_empty() {
        key.to_string()
    } else {
        format!("{namespace}:{key}")
    }
}

/// Queues one store command onto the pipeline, namespacing its keys.
fn push_command(pipe: &mut redis::Pipeline, namespace: &str, command: &StoreCommand) {
    match command {
        StoreCommand::SetAdd { key, member } => {
            pipe.cmd("SADD").arg(namespaced(namespace, key)).arg(member);
        }
        StoreCommand::SetRemove { key, member } => {
            pipe.cmd("SREM").arg(namespaced(namespace, key)).arg(member);
        }
        StoreCommand::SortedSetAdd { key, score, member } => {
            pipe.cmd("ZADD")
                .arg(namespaced(namespace, key))
                .arg(*score)
                .arg(member);
        }
        StoreCommand::HashSet { key, field, value } => {
            pipe.cmd("HSET")
                .arg(namespaced(namespace, key))
                .arg(field)
                .arg(value);
        }
        StoreCommand::HashSetIfAbsent { key, field, value } => {
            pipe.cmd("HSETNX")
                .arg(namespaced(namespace, key))
                .arg(field)
                .arg(value);
        }
        StoreCommand::HashIncrBy { key, field, amount } => {
            pipe.cmd("HINCRBY")
                .arg(namespaced(namespace, key))
                .arg(field)
                .arg(*amount);
        }
        StoreCommand::RenameKey { old, new } => {
            pipe.cmd("RENAME")
                .arg(namespaced(namespace, old))
                .arg(namespaced(namespace, new));
        }
    }
}

/// Maps one committed reply slot onto the typed reply model.
fn convert_reply(value: redis::Value) -> Result<BatchReply, RedqError> {
    match value {
        redis::Value::Int(n) => Ok(BatchReply::Int(n)),
        redis::Value::Okay => Ok(BatchReply::Ok),
        redis::Value::SimpleString(_) => Ok(BatchReply::Ok),
        other => Err(RedqError::connection(std::io::Error::other(format!(
            "unexpected transaction reply: {other:?}"
        )))),
    }
}

/// A `CommandExecutor` speaking to a Redis server.
///
/// Immediate calls run directly on the multiplexed connection; batches
/// commit as MULTI/EXEC via an atomic pipeline, so either every queued
/// command applies or none do. Cheap to clone.
#[derive(Clone)]
pub struct RedisExecutor {
    conn: MultiplexedConnection,
    namespace: String,
}

impl RedisExecutor {
    /// Connects to the configured server and verifies the connection
    /// with a PING.
    pub async fn connect(config: RedisConfig) -> Result<Self, RedqError> {
        config.validate()?;
        let client = redis::Client::open(config.url().as_str()).map_err(RedqError::connection)?;

        let connecting = client.get_multiplexed_async_connection();
        let mut conn = if config.connect_timeout_ms > 0 {
            tokio::time::timeout(Duration::from_millis(config.connect_timeout_ms), connecting)
                .await
                .map_err(|_| {
                    RedqError::connection(std::io::Error::new(
                        std::io::ErrorKind::TimedOut,
                        "timed out connecting to redis",
                    ))
                })?
                .map_err(RedqError::connection)?
        } else {
            connecting.await.map_err(RedqError::connection)?
        };

        let _pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(RedqError::connection)?;
        debug!(host = %config.host, port = config.port, namespace = %config.namespace, "connected to redis");

        Ok(Self {
            conn,
            namespace: config.namespace,
        })
    }

    /// The namespace applied to every key.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl CommandExecutor for RedisExecutor {
    async fn read_hash_fields(
        &self,
        key: &str,
        fields: &[&str],
    ) -> Result<Vec<Option<String>>, RedqError> {
        let mut conn = self.conn.clone();
        let values: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(namespaced(&self.namespace, key))
            .arg(fields)
            .query_async(&mut conn)
            .await
            .map_err(RedqError::connection)?;
        Ok(values)
    }

    async fn read_clock(&self) -> Result<StoreTime, RedqError> {
        let mut conn = self.conn.clone();
        let (seconds, micros): (u64, u32) = redis::cmd("TIME")
            .query_async(&mut conn)
            .await
            .map_err(RedqError::connection)?;
        Ok(StoreTime::new(seconds, micros))
    }

    async fn execute(&self, batch: CommandBatch) -> Result<Vec<BatchReply>, RedqError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let mut pipe = redis::pipe();
        pipe.atomic();
        for command in batch.commands() {
            push_command(&mut pipe, &self.namespace, command);
        }
        trace!(commands = batch.len(), "committing transaction");

        let mut conn = self.conn.clone();
        let values: Vec<redis::Value> = pipe
            .query_async(&mut conn)
            .await
            .map_err(RedqError::connection)?;
        values.into_iter().map(convert_reply).collect()
    }
}
