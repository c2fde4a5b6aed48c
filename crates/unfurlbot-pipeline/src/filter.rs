// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Staleness filter for trigger messages.
//!
//! Decides whether a message is still worth unfurling before any hook runs.
//! The decision is a pure function of the message, the configured maximum
//! age, and an injected clock; the processor owns the logging.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use unfurlbot_core::{TimestampSource, TriggerMessage, parse_slack_timestamp};

/// Outcome of the staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterDecision {
    /// Process the message.
    Fresh,
    /// Discard: the evaluated timestamp is older than the maximum age.
    Stale {
        /// Computed age at evaluation time.
        age: TimeDelta,
    },
    /// Discard: the evaluated timestamp could not be parsed.
    Malformed,
}

/// Evaluates a trigger message against the configured maximum age.
///
/// `timestamp_source` selects the trigger timestamp or the thread-root
/// timestamp (replies to an old thread are then themselves stale). A zero
/// `max_age` disables the filter entirely.
pub fn evaluate(
    message: &TriggerMessage,
    max_age: Duration,
    timestamp_source: TimestampSource,
    now: DateTime<Utc>,
) -> FilterDecision {
    if max_age.is_zero() {
        return FilterDecision::Fresh;
    }

    let Some(timestamp) = parse_slack_timestamp(message.filter_ts(timestamp_source)) else {
        return FilterDecision::Malformed;
    };

    let age = now - timestamp;
    let limit = TimeDelta::from_std(max_age).unwrap_or(TimeDelta::MAX);
    if age > limit {
        FilterDecision::Stale { age }
    } else {
        FilterDecision::Fresh
    }
}
