// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Debounce cache backend for unfurlbot.
//!
//! Implements [`unfurlbot_core::DebounceStore`] on top of Redis. The claim
//! contract itself is exercised against the in-memory store in
//! `unfurlbot-test-utils`; this crate only adds the Redis wiring.

pub mod store;

pub use store::RedisDebounceStore;
