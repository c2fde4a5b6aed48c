// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pipeline controller.
//!
//! Runs one trigger message through the shared skeleton: staleness filter,
//! then per registered domain: extract tokens, and per token claim → fetch
//! → create → dispatch. Tokens are processed independently; one token's
//! failure never aborts the rest, and nothing here retries. The debounce
//! claim is the only shared mutation.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use unfurlbot_core::{DebounceKey, DebounceStore, TimestampSource, Token, TriggerMessage};
use unfurlbot_slack::ChatDispatcher;

use crate::filter::{self, FilterDecision};
use crate::unfurler::DomainUnfurler;

/// Tunables for the processor, all externally supplied.
#[derive(Debug, Clone)]
pub struct ProcessorSettings {
    /// Maximum trigger-message age before discard; zero disables filtering.
    pub max_message_age: Duration,
    /// Which timestamp the staleness filter evaluates.
    pub timestamp_source: TimestampSource,
    /// Debounce TTL; zero means "never suppress".
    pub debounce_ttl: Duration,
}

/// Terminal outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// The message was discarded by the staleness filter.
    Stale,
    /// The message timestamp was unparseable; nothing was processed.
    Skipped,
    /// All tokens were processed (possibly none).
    Completed {
        sent: usize,
        suppressed: usize,
        failed: usize,
    },
}

enum TokenOutcome {
    Sent,
    Suppressed,
    Failed,
}

/// Orchestrates registered domain unfurlers over incoming trigger messages.
///
/// Holds shared collaborators behind `Arc` so the same processor can be
/// invoked concurrently for distinct messages; correctness under concurrent
/// duplicate mentions rests on the atomicity of the debounce claim.
pub struct UnfurlProcessor {
    unfurlers: Vec<Arc<dyn DomainUnfurler>>,
    debounce: Arc<dyn DebounceStore>,
    dispatcher: Arc<dyn ChatDispatcher>,
    settings: ProcessorSettings,
}

impl UnfurlProcessor {
    pub fn new(
        unfurlers: Vec<Arc<dyn DomainUnfurler>>,
        debounce: Arc<dyn DebounceStore>,
        dispatcher: Arc<dyn ChatDispatcher>,
        settings: ProcessorSettings,
    ) -> Self {
        Self {
            unfurlers,
            debounce,
            dispatcher,
            settings,
        }
    }

    /// Processes one trigger message to a terminal outcome.
    ///
    /// Never returns an error: per-token failures are logged with their
    /// token context and counted, so a bad token cannot take down the
    /// worker or the remaining tokens.
    pub async fn process_message(&self, message: &TriggerMessage) -> ProcessOutcome {
        match filter::evaluate(
            message,
            self.settings.max_message_age,
            self.settings.timestamp_source,
            Utc::now(),
        ) {
            FilterDecision::Fresh => {}
            FilterDecision::Stale { age } => {
                warn!(
                    channel = %message.channel,
                    thread_ts = message.thread_ts.as_deref(),
                    message_ts = %message.ts,
                    age_seconds = age.num_seconds(),
                    "stale message ignored"
                );
                return ProcessOutcome::Stale;
            }
            FilterDecision::Malformed => {
                warn!(
                    channel = %message.channel,
                    message_ts = %message.ts,
                    "message timestamp unparseable, skipping"
                );
                return ProcessOutcome::Skipped;
            }
        }

        let mut sent = 0;
        let mut suppressed = 0;
        let mut failed = 0;
        // Tokens already handled in this message's batch. An in-message
        // duplicate must not reach the cache a second time.
        let mut seen: HashSet<(&'static str, String)> = HashSet::new();

        for unfurler in &self.unfurlers {
            for token in unfurler.extract_tokens(message) {
                if !seen.insert((token.domain, token.value.clone())) {
                    continue;
                }
                match self.unfurl_token(unfurler.as_ref(), message, &token).await {
                    TokenOutcome::Sent => sent += 1,
                    TokenOutcome::Suppressed => suppressed += 1,
                    TokenOutcome::Failed => failed += 1,
                }
            }
        }

        debug!(
            channel = %message.channel,
            sent, suppressed, failed,
            "message processing complete"
        );
        ProcessOutcome::Completed {
            sent,
            suppressed,
            failed,
        }
    }

    /// Runs one token through claim → fetch → create → dispatch.
    ///
    /// Exactly one structured event is logged per terminal outcome. A claim
    /// taken before a failed fetch or dispatch is intentionally left in
    /// place: the key stays suppressed until TTL expiry.
    async fn unfurl_token(
        &self,
        unfurler: &dyn DomainUnfurler,
        message: &TriggerMessage,
        token: &Token,
    ) -> TokenOutcome {
        let key = DebounceKey::for_token(message, token);
        match self
            .debounce
            .try_claim(&key, self.settings.debounce_ttl)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                info!(
                    domain = token.domain,
                    token = %token.value,
                    channel = %message.channel,
                    thread_ts = message.thread_ts.as_deref(),
                    "unfurl suppressed by debounce"
                );
                return TokenOutcome::Suppressed;
            }
            Err(e) => {
                // Fail closed: without a granted claim we never post, so a
                // cache outage cannot cause a duplicate-unfurl storm.
                error!(
                    domain = token.domain,
                    token = %token.value,
                    channel = %message.channel,
                    thread_ts = message.thread_ts.as_deref(),
                    error = %e,
                    "debounce cache unavailable, failing closed"
                );
                return TokenOutcome::Failed;
            }
        }

        let metadata = match unfurler.fetch(token).await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    domain = token.domain,
                    token = %token.value,
                    channel = %message.channel,
                    thread_ts = message.thread_ts.as_deref(),
                    error = %e,
                    "metadata fetch failed"
                );
                return TokenOutcome::Failed;
            }
        };

        let reply = unfurler.create_message(message, token, &metadata);
        match self.dispatcher.post_message(&reply).await {
            Ok(()) => {
                info!(
                    domain = token.domain,
                    token = %token.value,
                    channel = %message.channel,
                    thread_ts = message.thread_ts.as_deref(),
                    "unfurl sent"
                );
                TokenOutcome::Sent
            }
            Err(e) => {
                error!(
                    domain = token.domain,
                    token = %token.value,
                    channel = %message.channel,
                    thread_ts = message.thread_ts.as_deref(),
                    error = %e,
                    "dispatch failed, claim kept until TTL expiry"
                );
                TokenOutcome::Failed
            }
        }
    }
}
