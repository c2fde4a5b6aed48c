// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The unfurl processing pipeline.
//!
//! Wires the staleness filter, the [`DomainUnfurler`] hook protocol, and
//! the debounce cache into a single shared controller. Registered domains
//! only implement extraction, metadata lookup, and message formatting; the
//! controller guarantees identical staleness handling, debounce handling,
//! and logging for every domain.

pub mod filter;
pub mod processor;
pub mod source;
pub mod unfurler;

pub use filter::FilterDecision;
pub use processor::{ProcessOutcome, ProcessorSettings, UnfurlProcessor};
pub use source::{ChannelSource, MessageSource};
pub use unfurler::DomainUnfurler;
