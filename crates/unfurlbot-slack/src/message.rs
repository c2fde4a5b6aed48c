// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack Block Kit message model.
//!
//! Builds the `chat.postMessage` payload from typed blocks. Slack rejects
//! whole messages when any text block exceeds its length limit, so every
//! text object is escaped and end-truncated on the way out.

use serde_json::{Value, json};

/// Maximum characters Slack accepts in a top-level or section text object.
const MAX_TEXT_LENGTH: usize = 3000;

/// Maximum characters Slack accepts in a section field.
const MAX_FIELD_LENGTH: usize = 2000;

/// Maximum blocks per message (app surfaces allow more, messages do not).
const MAX_BLOCKS: usize = 50;

/// A text object inside a block.
///
/// <https://api.slack.com/reference/messaging/composition-objects#text>
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackTextObject {
    pub text: String,
    /// `mrkdwn` or `plain_text`.
    pub kind: &'static str,
    /// When `false`, Slack linkifies URLs and parses mentions (mrkdwn only).
    pub verbatim: bool,
}

impl SlackTextObject {
    /// A markdown text object with link parsing enabled.
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: "mrkdwn",
            verbatim: false,
        }
    }

    fn to_payload(&self, max_length: usize) -> Value {
        let mut data = json!({
            "type": self.kind,
            "text": format_and_truncate_at_end(&self.text, max_length),
        });
        if self.kind == "mrkdwn" {
            data["verbatim"] = Value::Bool(self.verbatim);
        }
        data
    }
}

/// A Block Kit layout block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlackBlock {
    /// A markdown section with optional two-column fields.
    Section {
        text: String,
        fields: Vec<SlackTextObject>,
    },
    /// A context block of small muted elements (up to ten).
    Context { elements: Vec<SlackTextObject> },
}

impl SlackBlock {
    fn to_payload(&self) -> Value {
        match self {
            Self::Section { text, fields } => {
                let mut payload = json!({
                    "type": "section",
                    "text": SlackTextObject::mrkdwn(text.clone()).to_payload(MAX_TEXT_LENGTH),
                });
                if !fields.is_empty() {
                    payload["fields"] = Value::Array(
                        fields
                            .iter()
                            .map(|f| f.to_payload(MAX_FIELD_LENGTH))
                            .collect(),
                    );
                }
                payload
            }
            Self::Context { elements } => json!({
                "type": "context",
                "elements": elements
                    .iter()
                    .map(|e| e.to_payload(MAX_TEXT_LENGTH))
                    .collect::<Vec<_>>(),
            }),
        }
    }
}

/// A complete Block Kit message addressed to a conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackBlockKitMessage {
    /// Fallback text shown in notifications when blocks are present.
    pub text: String,
    pub blocks: Vec<SlackBlock>,
    /// Channel the message is posted to.
    pub channel: String,
    /// Thread-root timestamp when replying inside a thread.
    pub thread_ts: Option<String>,
}

impl SlackBlockKitMessage {
    /// Renders the `chat.postMessage` request body.
    pub fn to_payload(&self) -> Value {
        let mut payload = json!({
            "channel": self.channel,
            "text": format_and_truncate_at_end(&self.text, MAX_TEXT_LENGTH),
            "mrkdwn": true,
            "blocks": self.blocks
                .iter()
                .take(MAX_BLOCKS)
                .map(SlackBlock::to_payload)
                .collect::<Vec<_>>(),
        });
        if let Some(thread_ts) = &self.thread_ts {
            payload["thread_ts"] = Value::String(thread_ts.clone());
        }
        payload
    }
}

/// Escapes the characters Slack treats as control sequences in mrkdwn text.
///
/// Apply to literal content interpolated into a message (titles,
/// descriptions, names), never to composed mrkdwn such as `<url|label>`
/// links.
pub fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Truncates text at the end to fit Slack's per-block length limits.
///
/// Truncation prefers the last newline before the limit so a cut block ends
/// on a whole line; otherwise it cuts mid-line. The ` [...]` marker is
/// always appended to a truncated string.
pub fn format_and_truncate_at_end(text: &str, max_length: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_length {
        return trimmed.to_string();
    }

    const MARKER: &str = " [...]";
    let budget = max_length.saturating_sub(MARKER.len());
    let head: String = trimmed.chars().take(budget).collect();
    match head.rfind('\n') {
        Some(idx) => format!("{}{MARKER}", &head[..idx]),
        None => format!("{head}{MARKER}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_text("a < b & c > d"), "a &lt; b &amp; c &gt; d");
    }

    #[test]
    fn escape_leaves_link_syntax_to_the_caller() {
        // Composed mrkdwn must not pass through escape_text.
        assert_eq!(
            escape_text("<https://j/DM-1|DM-1>"),
            "&lt;https://j/DM-1|DM-1&gt;"
        );
    }

    #[test]
    fn short_text_is_untouched_apart_from_trim() {
        assert_eq!(format_and_truncate_at_end("  hello  ", 100), "hello");
    }

    #[test]
    fn truncates_at_last_newline() {
        let text = "first line\nsecond line\nthird line that goes on";
        let out = format_and_truncate_at_end(text, 30);
        assert_eq!(out, "first line\nsecond line [...]");
        assert!(out.chars().count() <= 30);
    }

    #[test]
    fn truncates_mid_line_without_newline() {
        let text = "x".repeat(40);
        let out = format_and_truncate_at_end(&text, 20);
        assert_eq!(out.chars().count(), 20);
        assert!(out.ends_with(" [...]"));
    }

    #[test]
    fn section_payload_shape() {
        let block = SlackBlock::Section {
            text: "*DM-1234*: fix the thing".into(),
            fields: vec![],
        };
        let payload = block.to_payload();
        assert_eq!(payload["type"], "section");
        assert_eq!(payload["text"]["type"], "mrkdwn");
        assert_eq!(payload["text"]["verbatim"], false);
        assert!(payload.get("fields").is_none());
    }

    #[test]
    fn context_payload_shape() {
        let block = SlackBlock::Context {
            elements: vec![SlackTextObject::mrkdwn("Status: Done")],
        };
        let payload = block.to_payload();
        assert_eq!(payload["type"], "context");
        assert_eq!(payload["elements"][0]["text"], "Status: Done");
    }

    #[test]
    fn message_payload_includes_thread_ts_only_when_threaded() {
        let mut message = SlackBlockKitMessage {
            text: "fallback".into(),
            blocks: vec![],
            channel: "C1".into(),
            thread_ts: None,
        };
        assert!(message.to_payload().get("thread_ts").is_none());

        message.thread_ts = Some("1700000000.000100".into());
        assert_eq!(message.to_payload()["thread_ts"], "1700000000.000100");
    }
}
