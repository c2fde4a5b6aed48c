// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Redis implementation of the debounce store.
//!
//! A claim is a single `SET key value NX PX ttl` round trip, so two workers
//! racing on the same key are serialized by Redis itself and exactly one of
//! them observes a granted claim. The stored value (claim time, RFC 3339) is
//! informational only; existence alone means "already unfurled", and records
//! are destroyed by TTL expiry, never deleted explicitly.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use tracing::debug;

use unfurlbot_core::{DebounceKey, DebounceStore, UnfurlbotError};

/// Debounce store backed by a shared Redis connection.
///
/// The connection is acquired once at process start and released when the
/// store is dropped at shutdown.
#[derive(Clone)]
pub struct RedisDebounceStore {
    conn: ConnectionManager,
}

impl RedisDebounceStore {
    /// Connects to the Redis instance at `url`.
    pub async fn connect(url: &str) -> Result<Self, UnfurlbotError> {
        let client = redis::Client::open(url).map_err(|e| UnfurlbotError::Cache {
            message: format!("invalid redis URL: {e}"),
            source: Some(Box::new(e)),
        })?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| UnfurlbotError::Cache {
                message: format!("redis connection failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        debug!("redis debounce store connected");
        Ok(Self { conn })
    }
}

#[async_trait]
impl DebounceStore for RedisDebounceStore {
    async fn try_claim(&self, key: &DebounceKey, ttl: Duration) -> Result<bool, UnfurlbotError> {
        // Zero TTL degenerates to "never suppress": grant without storing.
        if ttl.is_zero() {
            return Ok(true);
        }

        let claimed_at = chrono::Utc::now().to_rfc3339();
        let mut conn = self.conn.clone();
        let reply: Option<String> = redis::cmd("SET")
            .arg(key.cache_key())
            .arg(claimed_at)
            .arg("NX")
            .arg("PX")
            .arg(ttl.as_millis() as u64)
            .query_async(&mut conn)
            .await
            .map_err(|e| UnfurlbotError::Cache {
                message: format!("redis SET NX failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        // SET NX answers OK when the key was written, nil when it existed.
        Ok(reply.is_some())
    }
}
