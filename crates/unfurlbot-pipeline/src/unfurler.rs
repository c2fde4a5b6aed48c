// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The domain unfurler hook protocol.
//!
//! One implementation per identifier domain. The processing skeleton
//! (staleness handling, debounce claims, outcome logging) lives in
//! [`crate::processor::UnfurlProcessor`] and is never reimplemented per
//! domain; an unfurler only supplies extraction, metadata lookup, and
//! message formatting.

use async_trait::async_trait;

use unfurlbot_core::{Token, TriggerMessage, UnfurlMetadata, UnfurlbotError};
use unfurlbot_slack::SlackBlockKitMessage;

/// Hooks implemented by each registered identifier domain.
#[async_trait]
pub trait DomainUnfurler: Send + Sync {
    /// Domain tag carried on tokens and log events, e.g. `"jira"`.
    fn domain(&self) -> &'static str;

    /// Scans message text for identifier mentions.
    ///
    /// Pure and restartable; tokens appear in first-occurrence order and
    /// in-message duplicates are each yielded (deduplication happens in the
    /// processor). Malformed text never errors, it yields nothing.
    fn extract_tokens(&self, message: &TriggerMessage) -> Vec<Token>;

    /// Fetches descriptive metadata for one token from the domain's lookup
    /// service. This is the pipeline's only suspension point besides the
    /// debounce claim.
    async fn fetch(&self, token: &Token) -> Result<UnfurlMetadata, UnfurlbotError>;

    /// Builds the unfurl reply for a fetched token.
    ///
    /// Pure; must tolerate absent optional metadata fields by omitting
    /// them, and must address the reply to the source conversation and
    /// thread.
    fn create_message(
        &self,
        message: &TriggerMessage,
        token: &Token,
        metadata: &UnfurlMetadata,
    ) -> SlackBlockKitMessage;
}
