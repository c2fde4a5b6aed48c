// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory debounce store for deterministic testing.
//!
//! Honors the full `DebounceStore` contract (atomic claim, TTL expiry, zero
//! TTL never suppresses) and additionally counts claim attempts and can
//! simulate a backend outage.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use unfurlbot_core::{DebounceKey, DebounceStore, UnfurlbotError};

/// A `DebounceStore` backed by a mutex-guarded map of expiry instants.
#[derive(Default)]
pub struct MemoryDebounceStore {
    entries: Mutex<HashMap<String, Instant>>,
    claim_attempts: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryDebounceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `try_claim` calls that reached the store.
    pub fn claim_attempts(&self) -> usize {
        self.claim_attempts.load(Ordering::SeqCst)
    }

    /// When set, every claim fails with a cache error, as if the backend
    /// connection were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Seeds an unexpired record, as if the key had already been unfurled.
    pub fn preclaim(&self, key: &DebounceKey, ttl: Duration) {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.cache_key(), Instant::now() + ttl);
    }
}

#[async_trait]
impl DebounceStore for MemoryDebounceStore {
    async fn try_claim(&self, key: &DebounceKey, ttl: Duration) -> Result<bool, UnfurlbotError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(UnfurlbotError::Cache {
                message: "simulated outage".into(),
                source: None,
            });
        }
        self.claim_attempts.fetch_add(1, Ordering::SeqCst);

        if ttl.is_zero() {
            return Ok(true);
        }

        let now = Instant::now();
        let mut entries = self.entries.lock().expect("store mutex poisoned");
        if let Some(expiry) = entries.get(&key.cache_key()) {
            if *expiry > now {
                return Ok(false);
            }
        }
        entries.insert(key.cache_key(), now + ttl);
        Ok(true)
    }
}
