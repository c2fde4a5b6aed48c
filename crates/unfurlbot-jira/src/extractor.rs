// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Issue-key extraction from Slack message text.
//!
//! Matching runs over a sanitized copy of the text in which code, URLs, and
//! known key prefixes are overwritten with spaces. Every rewrite preserves
//! byte length, so match spans index the original text.

use std::ops::Range;

use regex::Regex;

use unfurlbot_core::{Token, UnfurlbotError};

/// Domain tag carried on extracted tokens.
pub const JIRA_DOMAIN: &str = "jira";

/// Extracts issue keys (`PROJECT-123`) for a configured set of projects.
#[derive(Debug, Clone)]
pub struct JiraKeyExtractor {
    key_pattern: Regex,
    fenced_code: Regex,
    inline_code: Regex,
    tickets_prefix: Regex,
    url: Regex,
    browse_prefix: String,
}

impl JiraKeyExtractor {
    /// Builds an extractor for the given Jira root URL and project codes.
    pub fn new(root_url: &str, projects: &[String]) -> Result<Self, UnfurlbotError> {
        if projects.is_empty() {
            return Err(UnfurlbotError::Config(
                "jira.projects must name at least one project code".into(),
            ));
        }

        // Longest code first, so a project sharing a shorter project's
        // suffix or prefix cannot shadow it in the alternation.
        let mut codes: Vec<String> = projects.iter().map(|p| regex::escape(p)).collect();
        codes.sort_by_key(|c| std::cmp::Reverse(c.len()));

        // The word boundary sits before the project letters: LDM-1234 must
        // never be read as DM-1234.
        let key_pattern = format!(r"\b(?:{})-[0-9]+", codes.join("|"));

        Ok(Self {
            key_pattern: compile(&key_pattern)?,
            fenced_code: compile(r"(?s)```.*?```")?,
            inline_code: compile(r"`[^`\n]*`")?,
            tickets_prefix: compile(r"tickets/[A-Z]")?,
            url: compile(r"https?://\S+")?,
            browse_prefix: format!("{}/browse/", root_url.trim_end_matches('/')),
        })
    }

    /// Scans `text` and returns tokens in first-occurrence order.
    ///
    /// Duplicate mentions are each yielded; deduplication is the pipeline's
    /// job. Spans index `text`, not the sanitized copy.
    pub fn extract(&self, text: &str) -> Vec<Token> {
        let sanitized = self.sanitize(text);
        self.key_pattern
            .find_iter(&sanitized)
            .map(|m| Token {
                domain: JIRA_DOMAIN,
                value: m.as_str().to_string(),
                span: m.range(),
            })
            .collect()
    }

    /// Blanks out regions that must not produce matches.
    ///
    /// URLs go first: a Jira browse link loses only its prefix so the key
    /// survives at its original offset, while every other URL disappears
    /// whole, taking any key embedded in its path with it.
    fn sanitize(&self, text: &str) -> String {
        let mut buf = text.to_string();

        blank_all(&mut buf, &self.fenced_code);
        blank_all(&mut buf, &self.inline_code);

        let urls: Vec<Range<usize>> = self.url.find_iter(&buf).map(|m| m.range()).collect();
        for range in urls {
            if buf[range.clone()].starts_with(&self.browse_prefix) {
                blank(&mut buf, range.start..range.start + self.browse_prefix.len());
            } else {
                blank(&mut buf, range);
            }
        }

        // A bare `tickets/DM-123` path mention counts as a key mention;
        // URLs are already spaces, so only the non-URL form reaches this.
        let prefix_starts: Vec<usize> = self
            .tickets_prefix
            .find_iter(&buf)
            .map(|m| m.start())
            .collect();
        for start in prefix_starts {
            blank(&mut buf, start..start + "tickets/".len());
        }

        buf
    }
}

fn compile(pattern: &str) -> Result<Regex, UnfurlbotError> {
    Regex::new(pattern)
        .map_err(|e| UnfurlbotError::Config(format!("invalid extraction pattern: {e}")))
}

fn blank_all(buf: &mut String, pattern: &Regex) {
    let ranges: Vec<Range<usize>> = pattern.find_iter(buf).map(|m| m.range()).collect();
    for range in ranges {
        blank(buf, range);
    }
}

/// Overwrites a byte range with spaces, preserving total length.
fn blank(buf: &mut String, range: Range<usize>) {
    let spaces = " ".repeat(range.len());
    buf.replace_range(range, &spaces);
}
