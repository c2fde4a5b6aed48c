// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the unfurlbot service.
//!
//! This crate provides the shared error type, the trigger-message and token
//! types flowing through the unfurl pipeline, and the debounce cache seam
//! implemented by backend crates.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{FetchErrorKind, UnfurlbotError};
pub use traits::DebounceStore;
pub use types::{
    DebounceKey, SenderKind, TimestampSource, Token, TriggerMessage, UnfurlMetadata,
    parse_slack_timestamp,
};
