// SPDX-FileCopyrightText: 2026 Unfurlbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport seam between the event stream and the pipeline.
//!
//! The stream transport itself (Kafka consumer groups in the reference
//! deployment) is an external collaborator; it only needs to hand trigger
//! messages to a [`MessageSource`]. The bundled [`ChannelSource`] adapts a
//! bounded mpsc channel, which the binary fills from its ingest endpoint.

use async_trait::async_trait;
use tokio::sync::mpsc;

use unfurlbot_core::{TriggerMessage, UnfurlbotError};

/// A source of trigger messages. `None` means the stream has ended.
#[async_trait]
pub trait MessageSource: Send {
    async fn next_message(&mut self) -> Result<Option<TriggerMessage>, UnfurlbotError>;
}

/// Message source backed by a bounded in-process channel.
pub struct ChannelSource {
    rx: mpsc::Receiver<TriggerMessage>,
}

impl ChannelSource {
    /// Creates a source and the sender half that feeds it.
    pub fn new(capacity: usize) -> (mpsc::Sender<TriggerMessage>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self { rx })
    }
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next_message(&mut self) -> Result<Option<TriggerMessage>, UnfurlbotError> {
        Ok(self.rx.recv().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unfurlbot_core::SenderKind;

    fn message(text: &str) -> TriggerMessage {
        TriggerMessage {
            channel: "C1".into(),
            thread_ts: None,
            ts: "1700000000.000100".into(),
            text: text.into(),
            sender: SenderKind::Human,
            edited_ts: None,
        }
    }

    #[tokio::test]
    async fn delivers_messages_in_order_then_ends() {
        let (tx, mut source) = ChannelSource::new(4);
        tx.send(message("one")).await.unwrap();
        tx.send(message("two")).await.unwrap();
        drop(tx);

        assert_eq!(source.next_message().await.unwrap().unwrap().text, "one");
        assert_eq!(source.next_message().await.unwrap().unwrap().text, "two");
        assert!(source.next_message().await.unwrap().is_none());
    }
}
