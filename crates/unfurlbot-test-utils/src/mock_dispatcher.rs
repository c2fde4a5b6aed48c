// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capturing mock dispatcher.
//!
//! Records every posted message for assertion and can be switched into a
//! failing mode to exercise the dispatch-failure path.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use unfurlbot_core::UnfurlbotError;
use unfurlbot_slack::{ChatDispatcher, SlackBlockKitMessage};

/// A `ChatDispatcher` that captures outbound messages instead of posting.
#[derive(Default)]
pub struct MockDispatcher {
    sent: Mutex<Vec<SlackBlockKitMessage>>,
    failing: AtomicBool,
}

impl MockDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// When set, every post fails with a dispatch error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// All messages passed to `post_message` so far.
    pub fn sent_messages(&self) -> Vec<SlackBlockKitMessage> {
        self.sent.lock().expect("dispatcher mutex poisoned").clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().expect("dispatcher mutex poisoned").len()
    }
}

#[async_trait]
impl ChatDispatcher for MockDispatcher {
    async fn post_message(&self, message: &SlackBlockKitMessage) -> Result<(), UnfurlbotError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(UnfurlbotError::Dispatch {
                message: "simulated dispatch failure".into(),
                source: None,
            });
        }
        self.sent
            .lock()
            .expect("dispatcher mutex poisoned")
            .push(message.clone());
        Ok(())
    }
}
