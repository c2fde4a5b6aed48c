// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the unfurl pipeline, the domain crates, and the
//! cache backend.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Who authored a trigger message. Bot-originated mentions are in scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SenderKind {
    Human,
    Bot,
}

/// Which timestamp the staleness filter treats as authoritative.
///
/// `Thread` evaluates the thread-root timestamp for replies, so a resurfaced
/// old thread is itself considered stale. Unthreaded messages always fall
/// back to the trigger timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    #[default]
    Trigger,
    Thread,
}

/// Parses a Slack-style `seconds.fraction` timestamp string.
///
/// Returns `None` for anything that is not a decimal epoch timestamp.
pub fn parse_slack_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    let (secs, frac) = match ts.split_once('.') {
        Some((secs, frac)) => (secs, frac),
        None => (ts, ""),
    };
    let secs: i64 = secs.parse().ok()?;
    let micros: u32 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<6}").get(..6)?.parse().ok()?
    };
    DateTime::from_timestamp(secs, micros * 1_000)
}

/// An inbound chat message that may contain identifier mentions.
///
/// Constructed once per stream event and discarded after the pipeline run;
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMessage {
    /// Conversation (channel) identifier.
    pub channel: String,
    /// Thread-root timestamp when the message is a threaded reply.
    pub thread_ts: Option<String>,
    /// Message timestamp in Slack `seconds.fraction` form.
    pub ts: String,
    /// Raw message text.
    pub text: String,
    /// Human or bot sender.
    pub sender: SenderKind,
    /// Edit timestamp, if the message was edited.
    pub edited_ts: Option<String>,
}

impl TriggerMessage {
    /// The message timestamp as a UTC instant, if parseable.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_slack_timestamp(&self.ts)
    }

    /// The timestamp string the staleness filter should evaluate.
    pub fn filter_ts(&self, source: TimestampSource) -> &str {
        match source {
            TimestampSource::Trigger => &self.ts,
            TimestampSource::Thread => self.thread_ts.as_deref().unwrap_or(&self.ts),
        }
    }
}

/// An identifier mention found in message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Domain tag, e.g. `"jira"`.
    pub domain: &'static str,
    /// Canonical identifier string, e.g. `"DM-1234"`.
    pub value: String,
    /// Byte span of the match in the source text.
    pub span: Range<usize>,
}

/// The debounce cache key for one identifier in one conversation scope.
///
/// Two tokens with the same key within the cooldown window yield at most one
/// successful claim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DebounceKey {
    pub channel: String,
    pub thread_ts: Option<String>,
    pub domain: &'static str,
    pub value: String,
}

impl DebounceKey {
    /// Builds the key for a token mentioned in a trigger message.
    pub fn for_token(message: &TriggerMessage, token: &Token) -> Self {
        Self {
            channel: message.channel.clone(),
            thread_ts: message.thread_ts.clone(),
            domain: token.domain,
            value: token.value.clone(),
        }
    }

    /// Renders the backend cache key.
    ///
    /// The identifier is hex-encoded so arbitrary token characters cannot
    /// collide with the `:` separators.
    pub fn cache_key(&self) -> String {
        let token = hex::encode(self.value.as_bytes());
        let mut key = format!("unfurl:slack:{}:{}:{}", self.channel, self.domain, token);
        if let Some(thread_ts) = &self.thread_ts {
            key.push(':');
            key.push_str(thread_ts);
        }
        key
    }
}

/// Descriptive metadata for one identifier, as returned by a domain's
/// lookup service.
///
/// Every field except `title` and `url` is optional; message construction
/// must tolerate absence. Timestamps are normalized to UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfurlMetadata {
    /// One-line summary of the identifier.
    pub title: String,
    /// Homepage URL for the identifier.
    pub url: String,
    /// Status label, e.g. `"In Progress"`.
    pub status: Option<String>,
    /// Longer description, possibly absent.
    pub description: Option<String>,
    /// Creation time.
    pub created: Option<DateTime<Utc>>,
    /// Resolution time, if resolved.
    pub resolved: Option<DateTime<Utc>>,
    /// Display name of the reporter.
    pub reporter: Option<String>,
    /// Display name of the assignee.
    pub assignee: Option<String>,
}
