// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A configurable domain unfurler for pipeline tests.
//!
//! Extraction scans for literally configured identifiers, metadata comes
//! from a seeded map, and unknown identifiers produce a typed not-found
//! error. No network and no regex involved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use unfurlbot_core::{
    FetchErrorKind, Token, TriggerMessage, UnfurlMetadata, UnfurlbotError,
};
use unfurlbot_pipeline::DomainUnfurler;
use unfurlbot_slack::SlackBlockKitMessage;

/// A stub `DomainUnfurler` with scripted extraction and metadata.
pub struct StubUnfurler {
    domain: &'static str,
    keys: Vec<String>,
    metadata: HashMap<String, UnfurlMetadata>,
    extract_calls: AtomicUsize,
}

impl StubUnfurler {
    /// Creates a stub that recognizes the given identifier strings.
    pub fn new(domain: &'static str, keys: &[&str]) -> Self {
        Self {
            domain,
            keys: keys.iter().map(|k| k.to_string()).collect(),
            metadata: HashMap::new(),
            extract_calls: AtomicUsize::new(0),
        }
    }

    /// Seeds metadata for one identifier. Identifiers without seeded
    /// metadata fetch as not-found.
    pub fn with_metadata(mut self, value: &str, metadata: UnfurlMetadata) -> Self {
        self.metadata.insert(value.to_string(), metadata);
        self
    }

    /// Number of `extract_tokens` invocations observed.
    pub fn extract_calls(&self) -> usize {
        self.extract_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomainUnfurler for StubUnfurler {
    fn domain(&self) -> &'static str {
        self.domain
    }

    fn extract_tokens(&self, message: &TriggerMessage) -> Vec<Token> {
        self.extract_calls.fetch_add(1, Ordering::SeqCst);
        let mut tokens: Vec<Token> = Vec::new();
        for key in &self.keys {
            for (pos, matched) in message.text.match_indices(key.as_str()) {
                tokens.push(Token {
                    domain: self.domain,
                    value: matched.to_string(),
                    span: pos..pos + matched.len(),
                });
            }
        }
        // First-occurrence order across all configured keys.
        tokens.sort_by_key(|t| t.span.start);
        tokens
    }

    async fn fetch(&self, token: &Token) -> Result<UnfurlMetadata, UnfurlbotError> {
        match self.metadata.get(&token.value) {
            Some(metadata) => Ok(metadata.clone()),
            None => Err(UnfurlbotError::Fetch {
                domain: self.domain,
                token: token.value.clone(),
                kind: FetchErrorKind::NotFound,
                source: None,
            }),
        }
    }

    fn create_message(
        &self,
        message: &TriggerMessage,
        token: &Token,
        metadata: &UnfurlMetadata,
    ) -> SlackBlockKitMessage {
        SlackBlockKitMessage {
            text: format!("{}: {}", token.value, metadata.title),
            blocks: vec![],
            channel: message.channel.clone(),
            thread_ts: message.thread_ts.clone(),
        }
    }
}
