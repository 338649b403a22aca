// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress sinks receiving streaming completion increments.

use tokio::sync::mpsc;

use crate::types::{CompletionProgress, ProgressToken};

/// Receives progress events addressed by an opaque routing token.
///
/// Sending is synchronous and must not block; providers call it inline with
/// stream consumption so events arrive in delta order. No acknowledgment is
/// expected and delivery failures are the sink's concern.
pub trait ProgressSink: Send + Sync {
    fn send(&self, progress: CompletionProgress, token: &ProgressToken);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn send(&self, _progress: CompletionProgress, _token: &ProgressToken) {}
}

/// A progress event paired with the token it was addressed to.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedProgress {
    pub token: ProgressToken,
    pub progress: CompletionProgress,
}

/// Forwards events into an unbounded tokio channel, preserving order.
#[derive(Debug, Clone)]
pub struct ChannelProgressSink {
    tx: mpsc::UnboundedSender<RoutedProgress>,
}

impl ChannelProgressSink {
    /// Creates a sink and the receiver its events are delivered to.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<RoutedProgress>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn send(&self, progress: CompletionProgress, token: &ProgressToken) {
        // A dropped receiver just means nobody is listening anymore.
        let _ = self.tx.send(RoutedProgress {
            token: token.clone(),
            progress,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CompletionItem, Content};

    fn progress(text: &str) -> CompletionProgress {
        CompletionProgress {
            model: "deepseek-chat".into(),
            agent: "test".into(),
            message_id: "resp".into(),
            item: CompletionItem::content("resp-0", Content::text(text)).streaming(),
        }
    }

    #[tokio::test]
    async fn channel_sink_preserves_order_and_token() {
        let (sink, mut rx) = ChannelProgressSink::new();
        let token = ProgressToken::from("tok");
        sink.send(progress("a"), &token);
        sink.send(progress("b"), &token);
        drop(sink);

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.token, token);
        assert_eq!(first.progress.item.as_content().unwrap().as_text(), Some("a"));
        assert_eq!(second.progress.item.as_content().unwrap().as_text(), Some("b"));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn channel_sink_tolerates_dropped_receiver() {
        let (sink, rx) = ChannelProgressSink::new();
        drop(rx);
        sink.send(progress("lost"), &ProgressToken::from("tok"));
    }
}
