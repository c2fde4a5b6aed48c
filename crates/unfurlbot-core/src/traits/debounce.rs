// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounce cache seam.
//!
//! The cache is the only shared mutable resource in the pipeline; all
//! mutation goes through the atomic claim below. Read-then-write sequences
//! are not permitted in the core logic.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::UnfurlbotError;
use crate::types::DebounceKey;

/// A key-value backend providing an atomic claim with a time-to-live.
#[async_trait]
pub trait DebounceStore: Send + Sync {
    /// Attempts to claim the right to unfurl `key` for the next `ttl`.
    ///
    /// Returns `Ok(true)` and records the claim if no unexpired record
    /// exists; returns `Ok(false)` with no side effect otherwise. Must be
    /// atomic under concurrent callers targeting the same key. A zero `ttl`
    /// degenerates to "never suppress": the claim is granted and nothing is
    /// stored.
    ///
    /// Backend unavailability is an `Err`, never a rejected claim.
    async fn try_claim(&self, key: &DebounceKey, ttl: Duration) -> Result<bool, UnfurlbotError>;
}
