// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Jira domain unfurler.
//!
//! Supplies the three domain hooks; everything else (staleness, debounce,
//! logging) is the pipeline's job.

use async_trait::async_trait;

use unfurlbot_core::{Token, TriggerMessage, UnfurlMetadata, UnfurlbotError};
use unfurlbot_pipeline::DomainUnfurler;
use unfurlbot_slack::{SlackBlock, SlackBlockKitMessage, SlackTextObject, escape_text};

use crate::client::JiraIssueClient;
use crate::extractor::{JIRA_DOMAIN, JiraKeyExtractor};

/// Unfurls Jira issue keys mentioned in Slack messages.
pub struct JiraUnfurler {
    extractor: JiraKeyExtractor,
    client: JiraIssueClient,
}

impl JiraUnfurler {
    pub fn new(extractor: JiraKeyExtractor, client: JiraIssueClient) -> Self {
        Self { extractor, client }
    }
}

#[async_trait]
impl DomainUnfurler for JiraUnfurler {
    fn domain(&self) -> &'static str {
        JIRA_DOMAIN
    }

    fn extract_tokens(&self, message: &TriggerMessage) -> Vec<Token> {
        self.extractor.extract(&message.text)
    }

    async fn fetch(&self, token: &Token) -> Result<UnfurlMetadata, UnfurlbotError> {
        self.client.get_issue(&token.value).await.map(Into::into)
    }

    fn create_message(
        &self,
        message: &TriggerMessage,
        token: &Token,
        metadata: &UnfurlMetadata,
    ) -> SlackBlockKitMessage {
        let mut blocks = vec![SlackBlock::Section {
            text: format!(
                "<{}|{}>: {}",
                metadata.url,
                token.value,
                escape_text(&metadata.title)
            ),
            fields: vec![],
        }];

        if let Some(description) = &metadata.description {
            blocks.push(SlackBlock::Section {
                text: escape_text(description),
                fields: vec![],
            });
        }

        let mut elements = Vec::new();
        if let Some(status) = &metadata.status {
            elements.push(SlackTextObject::mrkdwn(format!(
                "*Status:* {}",
                escape_text(status)
            )));
        }
        if let Some(created) = &metadata.created {
            elements.push(SlackTextObject::mrkdwn(format!(
                "*Created:* {}",
                created.format("%Y-%m-%d")
            )));
        }
        if let Some(resolved) = &metadata.resolved {
            elements.push(SlackTextObject::mrkdwn(format!(
                "*Resolved:* {}",
                resolved.format("%Y-%m-%d")
            )));
        }
        if let Some(reporter) = &metadata.reporter {
            elements.push(SlackTextObject::mrkdwn(format!(
                "*Reporter:* {}",
                escape_text(reporter)
            )));
        }
        if let Some(assignee) = &metadata.assignee {
            elements.push(SlackTextObject::mrkdwn(format!(
                "*Assignee:* {}",
                escape_text(assignee)
            )));
        }
        if !elements.is_empty() {
            blocks.push(SlackBlock::Context { elements });
        }

        SlackBlockKitMessage {
            text: format!("{}: {}", token.value, metadata.title),
            blocks,
            channel: message.channel.clone(),
            thread_ts: message.thread_ts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn unfurler() -> JiraUnfurler {
        JiraUnfurler::new(
            JiraKeyExtractor::new("https://jira.example.org", &["DM".into(), "RFC".into()])
                .unwrap(),
            JiraIssueClient::new(
                reqwest::Client::new(),
                "https://proxy.example.org/jira-data-proxy",
                "https://jira.example.org",
                "gt-123",
                Duration::from_secs(20),
            ),
        )
    }

    fn message(text: &str, thread_ts: Option<&str>) -> TriggerMessage {
        TriggerMessage {
            channel: "C024BE91L".into(),
            thread_ts: thread_ts.map(Into::into),
            ts: "1700000000.000100".into(),
            text: text.into(),
            sender: unfurlbot_core::SenderKind::Human,
            edited_ts: None,
        }
    }

    fn token(value: &str) -> Token {
        Token {
            domain: JIRA_DOMAIN,
            value: value.into(),
            span: 0..value.len(),
        }
    }

    fn full_metadata() -> UnfurlMetadata {
        UnfurlMetadata {
            title: "Wrap code samples <safely>".into(),
            url: "https://jira.example.org/browse/DM-42711".into(),
            status: Some("Done".into()),
            description: Some("Longer text.".into()),
            created: Some(Utc.with_ymd_and_hms(2024, 1, 29, 23, 8, 48).unwrap()),
            resolved: Some(Utc.with_ymd_and_hms(2024, 1, 30, 23, 11, 11).unwrap()),
            reporter: Some("Alex Example".into()),
            assignee: None,
        }
    }

    #[test]
    fn extracts_through_the_domain_hook() {
        let tokens = unfurler().extract_tokens(&message("DM-1 and RFC-2", None));
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, "DM-1");
        assert_eq!(tokens[0].domain, "jira");
    }

    #[test]
    fn full_metadata_renders_link_description_and_context() {
        let reply = unfurler().create_message(
            &message("DM-42711", None),
            &token("DM-42711"),
            &full_metadata(),
        );
        assert_eq!(reply.channel, "C024BE91L");
        assert_eq!(reply.text, "DM-42711: Wrap code samples <safely>");

        match &reply.blocks[0] {
            SlackBlock::Section { text, .. } => {
                assert!(text.contains("<https://jira.example.org/browse/DM-42711|DM-42711>"));
                // Interpolated title content is escaped, the link is not.
                assert!(text.contains("&lt;safely&gt;"));
            }
            other => panic!("expected section, got {other:?}"),
        }
        match &reply.blocks[2] {
            SlackBlock::Context { elements } => {
                let joined: Vec<&str> = elements.iter().map(|e| e.text.as_str()).collect();
                assert!(joined.iter().any(|t| t.contains("*Status:* Done")));
                assert!(joined.iter().any(|t| t.contains("*Created:* 2024-01-29")));
                assert!(joined.iter().any(|t| t.contains("*Resolved:* 2024-01-30")));
                // Unassigned issues omit the assignee element.
                assert!(!joined.iter().any(|t| t.contains("*Assignee:*")));
            }
            other => panic!("expected context, got {other:?}"),
        }
    }

    #[test]
    fn bare_metadata_omits_optional_blocks() {
        let metadata = UnfurlMetadata {
            title: "Only a title".into(),
            url: "https://jira.example.org/browse/DM-1".into(),
            status: None,
            description: None,
            created: None,
            resolved: None,
            reporter: None,
            assignee: None,
        };
        let reply = unfurler().create_message(&message("DM-1", None), &token("DM-1"), &metadata);
        assert_eq!(reply.blocks.len(), 1);
    }

    #[test]
    fn reply_targets_the_source_thread() {
        let reply = unfurler().create_message(
            &message("DM-1", Some("1699999999.000500")),
            &token("DM-1"),
            &full_metadata(),
        );
        assert_eq!(reply.thread_ts.as_deref(), Some("1699999999.000500"));
    }
}
