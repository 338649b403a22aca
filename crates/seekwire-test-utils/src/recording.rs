// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sinks that record everything they receive, for later assertions.

use std::sync::{Mutex, PoisonError};

use seekwire_core::{
    CompletionProgress, Direction, ItemBody, MessageLog, ProgressSink, ProgressToken,
    RoutedProgress,
};

/// Records every progress event in delivery order.
#[derive(Debug, Default)]
pub struct RecordingProgressSink {
    events: Mutex<Vec<RoutedProgress>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the events received so far.
    pub fn events(&self) -> Vec<RoutedProgress> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenation of every text fragment, in order.
    pub fn text(&self) -> String {
        self.events()
            .iter()
            .filter_map(|e| e.progress.item.as_content().and_then(|c| c.as_text()))
            .collect()
    }

    /// Concatenated argument fragments of tool-call events with item `item_id`.
    pub fn tool_arguments(&self, item_id: &str) -> String {
        self.events()
            .iter()
            .filter(|e| e.progress.item.id == item_id)
            .filter_map(|e| match &e.progress.item.body {
                ItemBody::ToolCall(call) => Some(call.arguments.clone()),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingProgressSink {
    fn send(&self, progress: CompletionProgress, token: &ProgressToken) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RoutedProgress {
                token: token.clone(),
                progress,
            });
    }
}

/// One payload handed to a [`MessageLog`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedMessage {
    pub source: String,
    pub direction: Direction,
    pub payload: Vec<u8>,
}

impl LoggedMessage {
    /// The payload parsed as JSON.
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.payload)
    }
}

/// Records every logged payload.
#[derive(Debug, Default)]
pub struct RecordingMessageLog {
    messages: Mutex<Vec<LoggedMessage>>,
}

impl RecordingMessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<LoggedMessage> {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The first payload logged in `direction`, if any.
    pub fn first(&self, direction: Direction) -> Option<LoggedMessage> {
        self.messages().into_iter().find(|m| m.direction == direction)
    }
}

impl MessageLog for RecordingMessageLog {
    fn log(&self, source: &str, direction: Direction, payload: &[u8]) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LoggedMessage {
                source: source.to_string(),
                direction,
                payload: payload.to_vec(),
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seekwire_core::{CompletionItem, Content, ToolCall};

    fn progress(item: CompletionItem) -> CompletionProgress {
        CompletionProgress {
            model: "m".into(),
            agent: "a".into(),
            message_id: "r".into(),
            item,
        }
    }

    #[test]
    fn progress_sink_reassembles_text_and_arguments() {
        let sink = RecordingProgressSink::new();
        let token = ProgressToken::from("t");
        sink.send(progress(CompletionItem::content("r-0", Content::text("He"))), &token);
        let call = |args: &str| ToolCall {
            call_id: "c".into(),
            name: "f".into(),
            arguments: args.into(),
        };
        sink.send(progress(CompletionItem::tool_call("r-1", call("{\"a\""))), &token);
        sink.send(progress(CompletionItem::content("r-0", Content::text("llo"))), &token);
        sink.send(progress(CompletionItem::tool_call("r-1", call(":1}"))), &token);

        assert_eq!(sink.len(), 4);
        assert_eq!(sink.text(), "Hello");
        assert_eq!(sink.tool_arguments("r-1"), "{\"a\":1}");
        assert_eq!(sink.events()[0].token, token);
    }

    #[test]
    fn message_log_keeps_direction_and_payload() {
        let log = RecordingMessageLog::new();
        log.log("deepseek-api", Direction::Outbound, br#"{"model":"x"}"#);
        log.log("deepseek-api", Direction::Inbound, b"{}");

        let outbound = log.first(Direction::Outbound).unwrap();
        assert_eq!(outbound.source, "deepseek-api");
        assert_eq!(outbound.json().unwrap()["model"], "x");
        assert_eq!(log.messages().len(), 2);
    }
}
