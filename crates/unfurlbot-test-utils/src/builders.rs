// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for common test fixtures.

use chrono::Utc;

use unfurlbot_core::{SenderKind, TriggerMessage, UnfurlMetadata};

/// A human-sent message in `channel` with a current timestamp.
pub fn fresh_message(channel: &str, text: &str) -> TriggerMessage {
    TriggerMessage {
        channel: channel.into(),
        thread_ts: None,
        ts: format!("{}.000100", Utc::now().timestamp()),
        text: text.into(),
        sender: SenderKind::Human,
        edited_ts: None,
    }
}

/// Like [`fresh_message`] but with the timestamp shifted into the past.
pub fn aged_message(channel: &str, text: &str, age_seconds: i64) -> TriggerMessage {
    TriggerMessage {
        ts: format!("{}.000100", Utc::now().timestamp() - age_seconds),
        ..fresh_message(channel, text)
    }
}

/// Minimal metadata with only the required fields populated.
pub fn bare_metadata(title: &str, url: &str) -> UnfurlMetadata {
    UnfurlMetadata {
        title: title.into(),
        url: url.into(),
        status: None,
        description: None,
        created: None,
        resolved: None,
        reporter: None,
        assignee: None,
    }
}
