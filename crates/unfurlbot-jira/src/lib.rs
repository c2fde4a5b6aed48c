// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Jira issue-key domain for the unfurl pipeline.
//!
//! Recognizes `PROJECT-123` keys for a configured project list, fetches
//! issue summaries through the Jira data proxy, and formats Block Kit
//! replies.

pub mod client;
pub mod extractor;
pub mod model;
pub mod unfurler;

pub use client::JiraIssueClient;
pub use extractor::{JIRA_DOMAIN, JiraKeyExtractor};
pub use model::JiraIssueSummary;
pub use unfurler::JiraUnfurler;
