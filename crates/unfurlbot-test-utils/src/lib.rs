// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles and fixture builders for the unfurlbot workspace.
//!
//! Used from other crates' dev-dependencies; never shipped in a release
//! artifact.

pub mod builders;
pub mod memory_store;
pub mod mock_dispatcher;
pub mod stub_unfurler;

pub use builders::{aged_message, bare_metadata, fresh_message};
pub use memory_store::MemoryDebounceStore;
pub use mock_dispatcher::MockDispatcher;
pub use stub_unfurler::StubUnfurler;
