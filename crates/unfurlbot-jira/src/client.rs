// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Jira data proxy.
//!
//! Fetch failures map to typed kinds so the pipeline can tell a not-found
//! identifier (normal, skip the token) from a proxy outage.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use unfurlbot_core::{FetchErrorKind, UnfurlbotError};

use crate::extractor::JIRA_DOMAIN;
use crate::model::JiraIssueSummary;

/// Client for fetching Jira issues through the data proxy.
#[derive(Debug, Clone)]
pub struct JiraIssueClient {
    http: reqwest::Client,
    proxy_url: String,
    root_url: String,
    token: String,
    timeout: Duration,
}

impl JiraIssueClient {
    /// Creates a client from a shared HTTP client.
    ///
    /// `proxy_url` is the data proxy base (no trailing slash); `root_url`
    /// is the Jira instance used for browse links; `timeout` is the
    /// per-request deadline from configuration.
    pub fn new(
        http: reqwest::Client,
        proxy_url: impl Into<String>,
        root_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            proxy_url: proxy_url.into().trim_end_matches('/').to_string(),
            root_url: root_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout,
        }
    }

    /// Fetches one issue by key.
    pub async fn get_issue(&self, issue_key: &str) -> Result<JiraIssueSummary, UnfurlbotError> {
        let url = format!("{}/rest/api/2/issue/{issue_key}", self.proxy_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(issue_key, classify_reqwest(&e), e))?;

        let status = response.status();
        debug!(issue_key, status = %status, "jira proxy response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(UnfurlbotError::Fetch {
                domain: JIRA_DOMAIN,
                token: issue_key.to_string(),
                kind: FetchErrorKind::NotFound,
                source: None,
            });
        }
        if !status.is_success() {
            return Err(UnfurlbotError::Fetch {
                domain: JIRA_DOMAIN,
                token: issue_key.to_string(),
                kind: FetchErrorKind::Upstream(status.as_u16()),
                source: None,
            });
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| self.fetch_error(issue_key, FetchErrorKind::Transport, e))?;
        JiraIssueSummary::from_json(&data, &self.root_url)
    }

    fn fetch_error(
        &self,
        issue_key: &str,
        kind: FetchErrorKind,
        source: reqwest::Error,
    ) -> UnfurlbotError {
        UnfurlbotError::Fetch {
            domain: JIRA_DOMAIN,
            token: issue_key.to_string(),
            kind,
            source: Some(Box::new(source)),
        }
    }
}

fn classify_reqwest(error: &reqwest::Error) -> FetchErrorKind {
    if error.is_timeout() {
        FetchErrorKind::Timeout
    } else {
        FetchErrorKind::Transport
    }
}
