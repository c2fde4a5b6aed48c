// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack integration: the Block Kit payload model and the Web API client
//! used to dispatch unfurl replies.

pub mod client;
pub mod message;

pub use client::{ChatDispatcher, SlackClient};
pub use message::{
    SlackBlock, SlackBlockKitMessage, SlackTextObject, escape_text, format_and_truncate_at_end,
};
