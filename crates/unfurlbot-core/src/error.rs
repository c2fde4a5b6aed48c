// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the unfurlbot service.

use thiserror::Error;

/// Classifies a metadata fetch failure.
///
/// A not-found result is a normal outcome for an identifier that looks like
/// an issue key but does not exist; the pipeline logs it and moves on to the
/// next token. The other kinds cover the transport-level ways a fetch can go
/// wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    /// The lookup service reported that the identifier does not exist.
    NotFound,
    /// The request exceeded the configured per-domain timeout.
    Timeout,
    /// The lookup service answered with a non-success status.
    Upstream(u16),
    /// The request could not be sent or the response could not be read.
    Transport,
}

impl std::fmt::Display for FetchErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Timeout => write!(f, "timed out"),
            Self::Upstream(status) => write!(f, "upstream status {status}"),
            Self::Transport => write!(f, "transport failure"),
        }
    }
}

/// The primary error type used across the unfurlbot crates.
#[derive(Debug, Error)]
pub enum UnfurlbotError {
    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Debounce cache backend errors (connection failure, command failure).
    ///
    /// Distinct from a rejected claim, which is a normal `false` return.
    #[error("debounce cache error: {message}")]
    Cache {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Metadata fetch errors, carrying the domain and token for log context.
    #[error("metadata fetch failed for {domain} token {token}: {kind}")]
    Fetch {
        domain: &'static str,
        token: String,
        kind: FetchErrorKind,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat platform rejected or failed the outbound post.
    #[error("chat dispatch failed: {message}")]
    Dispatch {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An inbound stream record could not be interpreted as a trigger message.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl UnfurlbotError {
    /// Whether this error is a not-found fetch result.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Fetch {
                kind: FetchErrorKind::NotFound,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_carries_token_context() {
        let err = UnfurlbotError::Fetch {
            domain: "jira",
            token: "DM-501".into(),
            kind: FetchErrorKind::NotFound,
            source: None,
        };
        let rendered = err.to_string();
        assert!(rendered.contains("jira"));
        assert!(rendered.contains("DM-501"));
        assert!(rendered.contains("not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn cache_error_is_not_a_not_found() {
        let err = UnfurlbotError::Cache {
            message: "connection refused".into(),
            source: None,
        };
        assert!(!err.is_not_found());
    }

    #[test]
    fn fetch_kind_display() {
        assert_eq!(FetchErrorKind::Timeout.to_string(), "timed out");
        assert_eq!(FetchErrorKind::Upstream(503).to_string(), "upstream status 503");
    }
}
