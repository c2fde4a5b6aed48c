// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams implemented by backend crates.

pub mod debounce;

pub use debounce::DebounceStore;
