// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack Web API client for posting unfurl replies.
//!
//! Slack answers HTTP 200 with `"ok": false` for most application-level
//! failures, so the client checks the response body as well as the status.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use unfurlbot_core::UnfurlbotError;

use crate::message::SlackBlockKitMessage;

/// Posts a formatted message into the originating conversation.
#[async_trait]
pub trait ChatDispatcher: Send + Sync {
    /// Sends one Block Kit message. Failures are terminal for the token
    /// being processed; the caller does not retry.
    async fn post_message(&self, message: &SlackBlockKitMessage) -> Result<(), UnfurlbotError>;
}

/// Response envelope from `chat.postMessage`.
#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the Slack Web API.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    token: String,
    api_url: String,
}

impl SlackClient {
    /// Creates a client from a shared HTTP client and a bot token.
    ///
    /// `api_url` is the Web API base, normally `https://slack.com/api`;
    /// overridable for testing.
    pub fn new(http: reqwest::Client, token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http,
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatDispatcher for SlackClient {
    async fn post_message(&self, message: &SlackBlockKitMessage) -> Result<(), UnfurlbotError> {
        let url = format!("{}/chat.postMessage", self.api_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&message.to_payload())
            .send()
            .await
            .map_err(|e| UnfurlbotError::Dispatch {
                message: format!("chat.postMessage request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UnfurlbotError::Dispatch {
                message: format!("chat.postMessage returned {status}: {body}"),
                source: None,
            });
        }

        let body: PostMessageResponse =
            response
                .json()
                .await
                .map_err(|e| UnfurlbotError::Dispatch {
                    message: format!("chat.postMessage response unreadable: {e}"),
                    source: Some(Box::new(e)),
                })?;

        if !body.ok {
            return Err(UnfurlbotError::Dispatch {
                message: format!(
                    "Slack rejected the post: {}",
                    body.error.as_deref().unwrap_or("unknown error")
                ),
                source: None,
            });
        }

        debug!(channel = %message.channel, "message posted");
        Ok(())
    }
}
