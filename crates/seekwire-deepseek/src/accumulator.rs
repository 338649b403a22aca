// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Folds streamed chunks into one [`ChatCompletionResponse`].
//!
//! The accumulator is pure: it never performs I/O and reports each increment
//! it applied as a [`StreamDelta`], leaving progress delivery to the caller.

use thiserror::Error;

use crate::types::{
    ChatCompletionResponse, Choice, StreamChunk, ToolCallDelta, WireMessage, WireToolCall,
};

/// Prefix of every line carrying a chunk.
pub const DATA_PREFIX: &str = "data: ";

/// Payload marking the end of the stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One increment applied to the response under assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamDelta {
    /// Text appended to the assistant message.
    Text { text: String },
    /// A tool-call fragment, reported with the slot's accumulated identity and
    /// only this fragment's argument text.
    ToolCall {
        index: usize,
        call_id: String,
        name: String,
        arguments: String,
    },
}

/// A `data:` payload that did not decode as a chunk.
#[derive(Debug, Error)]
#[error("malformed stream chunk: {source}")]
pub struct ChunkError {
    pub payload: String,
    #[source]
    pub source: serde_json::Error,
}

/// What [`StreamAccumulator::feed_line`] did with a line.
#[derive(Debug)]
pub enum LineOutcome {
    /// Not a data line, or the stream already ended.
    Ignored,
    /// The end-of-stream sentinel.
    Done,
    /// The payload was skipped; accumulated state is unchanged.
    Malformed(ChunkError),
    /// A chunk was applied, yielding zero or more increments.
    Applied(Vec<StreamDelta>),
}

/// Accumulates a streamed chat completion.
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    response: ChatCompletionResponse,
    done: bool,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The response assembled so far.
    pub fn response(&self) -> &ChatCompletionResponse {
        &self.response
    }

    /// True once the `[DONE]` sentinel has been seen.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Consumes the accumulator, returning the assembled response.
    pub fn finish(self) -> ChatCompletionResponse {
        self.response
    }

    /// Processes one line of the response body (line terminator removed).
    pub fn feed_line(&mut self, line: &str) -> LineOutcome {
        if self.done {
            return LineOutcome::Ignored;
        }
        let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
            return LineOutcome::Ignored;
        };
        let payload = payload.trim();
        if payload == DONE_SENTINEL {
            self.done = true;
            return LineOutcome::Done;
        }
        match serde_json::from_str::<StreamChunk>(payload) {
            Ok(chunk) => LineOutcome::Applied(self.apply_chunk(chunk)),
            Err(source) => LineOutcome::Malformed(ChunkError {
                payload: payload.to_string(),
                source,
            }),
        }
    }

    /// Merges one decoded chunk and returns the increments it carried.
    ///
    /// Only the first choice of a chunk is read.
    pub fn apply_chunk(&mut self, chunk: StreamChunk) -> Vec<StreamDelta> {
        if self.response.id.is_empty() && !chunk.id.is_empty() {
            self.response.id = chunk.id;
            self.response.model = chunk.model;
            self.response.object = chunk.object;
            self.response.created = chunk.created;
        }
        if let Some(usage) = chunk.usage {
            self.response.usage = Some(usage);
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return Vec::new();
        };

        let mut deltas = Vec::new();

        if let Some(text) = choice.delta.content.filter(|t| !t.is_empty()) {
            self.assistant_message()
                .content
                .get_or_insert_with(String::new)
                .push_str(&text);
            deltas.push(StreamDelta::Text { text });
        }

        for fragment in choice.delta.tool_calls.unwrap_or_default() {
            let slots = &mut self.assistant_message().tool_calls;
            let slot = merge_tool_call(slots, &fragment);
            deltas.push(StreamDelta::ToolCall {
                index: fragment.index,
                call_id: slot.id.clone(),
                name: slot.function.name.clone(),
                arguments: fragment.arguments().to_string(),
            });
        }

        if let Some(reason) = choice.finish_reason.filter(|r| !r.is_empty()) {
            self.first_choice().finish_reason = Some(reason);
        }

        deltas
    }

    /// The first choice, created on demand with an empty assistant message.
    fn first_choice(&mut self) -> &mut Choice {
        if self.response.choices.is_empty() {
            self.response.choices.push(Choice {
                index: 0,
                message: WireMessage {
                    role: "assistant".to_string(),
                    ..Default::default()
                },
                finish_reason: None,
            });
        }
        &mut self.response.choices[0]
    }

    fn assistant_message(&mut self) -> &mut WireMessage {
        &mut self.first_choice().message
    }
}

/// Finds or allocates the slot for `fragment.index` and merges the fragment.
///
/// Slots stay in first-seen order. `id` and `name` change only when a later
/// fragment re-sends a non-empty value; arguments always append.
fn merge_tool_call<'a>(
    slots: &'a mut Vec<WireToolCall>,
    fragment: &ToolCallDelta,
) -> &'a WireToolCall {
    let position = match slots.iter().position(|s| s.index == fragment.index) {
        Some(position) => position,
        None => {
            slots.push(WireToolCall {
                index: fragment.index,
                kind: "function".to_string(),
                ..Default::default()
            });
            slots.len() - 1
        }
    };
    let slot = &mut slots[position];

    if let Some(id) = fragment.id.as_deref().filter(|id| !id.is_empty()) {
        slot.id = id.to_string();
    }
    if let Some(kind) = fragment.kind.as_deref().filter(|k| !k.is_empty()) {
        slot.kind = kind.to_string();
    }
    if let Some(function) = &fragment.function {
        if let Some(name) = function.name.as_deref().filter(|n| !n.is_empty()) {
            slot.function.name = name.to_string();
        }
        if let Some(arguments) = &function.arguments {
            slot.function.arguments.push_str(arguments);
        }
    }
    slot
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn text_chunk(id: &str, text: &str) -> String {
        format!(
            r#"data: {{"id":"{id}","model":"deepseek-chat","choices":[{{"index":0,"delta":{{"content":{}}}}}]}}"#,
            serde_json::to_string(text).unwrap()
        )
    }

    fn tool_chunk(index: usize, id: Option<&str>, name: Option<&str>, args: &str) -> String {
        let mut call = serde_json::json!({"index": index, "function": {"arguments": args}});
        if let Some(id) = id {
            call["id"] = id.into();
            call["type"] = "function".into();
        }
        if let Some(name) = name {
            call["function"]["name"] = name.into();
        }
        format!(
            "data: {}",
            serde_json::json!({
                "id": "chatcmpl-1",
                "model": "deepseek-chat",
                "choices": [{"index": 0, "delta": {"tool_calls": [call]}}]
            })
        )
    }

    fn feed_all(acc: &mut StreamAccumulator, lines: &[String]) -> Vec<StreamDelta> {
        let mut deltas = Vec::new();
        for line in lines {
            match acc.feed_line(line) {
                LineOutcome::Applied(d) => deltas.extend(d),
                LineOutcome::Done => break,
                LineOutcome::Ignored | LineOutcome::Malformed(_) => {}
            }
        }
        deltas
    }

    #[test]
    fn text_deltas_concatenate_in_order() {
        let mut acc = StreamAccumulator::new();
        let deltas = feed_all(
            &mut acc,
            &[
                text_chunk("chatcmpl-1", "Hel"),
                text_chunk("chatcmpl-1", "lo"),
                "data: [DONE]".to_string(),
            ],
        );
        assert_eq!(deltas.len(), 2);
        let resp = acc.finish();
        assert_eq!(resp.id, "chatcmpl-1");
        assert_eq!(resp.model, "deepseek-chat");
        assert_eq!(resp.content(), "Hello");
        assert_eq!(resp.message().unwrap().role, "assistant");
    }

    #[test]
    fn identity_is_taken_from_first_chunk_with_an_id() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(r#"data: {"id":"","model":"ignored","choices":[]}"#);
        acc.feed_line(&text_chunk("first", "a"));
        acc.feed_line(&text_chunk("second", "b"));
        assert_eq!(acc.response().id, "first");
        assert_eq!(acc.response().model, "deepseek-chat");
    }

    #[test]
    fn non_data_lines_are_ignored() {
        let mut acc = StreamAccumulator::new();
        for line in ["", ": keep-alive", "event: message", "data:[DONE]", "id: 7"] {
            assert!(matches!(acc.feed_line(line), LineOutcome::Ignored), "{line}");
        }
        assert!(!acc.is_done());
        assert_eq!(acc.finish(), ChatCompletionResponse::default());
    }

    #[test]
    fn done_stops_processing() {
        let mut acc = StreamAccumulator::new();
        let deltas = feed_all(
            &mut acc,
            &[
                text_chunk("c", "kept"),
                "data: [DONE]".to_string(),
                text_chunk("c", " dropped"),
            ],
        );
        assert_eq!(deltas.len(), 1);
        assert!(acc.is_done());
        assert!(matches!(acc.feed_line(&text_chunk("c", "x")), LineOutcome::Ignored));
        assert_eq!(acc.response().content(), "kept");
    }

    #[test]
    fn malformed_chunk_is_skipped_without_side_effects() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(&text_chunk("c", "a"));
        let before = acc.response().clone();
        match acc.feed_line("data: {not json") {
            LineOutcome::Malformed(err) => assert_eq!(err.payload, "{not json"),
            other => panic!("expected Malformed, got {other:?}"),
        }
        assert_eq!(acc.response(), &before);
        acc.feed_line(&text_chunk("c", "b"));
        assert_eq!(acc.response().content(), "ab");
    }

    #[test]
    fn interleaved_tool_call_fragments_are_routed_by_index() {
        let mut acc = StreamAccumulator::new();
        let deltas = feed_all(
            &mut acc,
            &[
                tool_chunk(0, Some("call_a"), Some("search"), ""),
                tool_chunk(1, Some("call_b"), Some("fetch"), "{\"u"),
                tool_chunk(0, None, None, "{\"q\":"),
                tool_chunk(1, None, None, "rl\":1}"),
                tool_chunk(1, None, None, ""),
                tool_chunk(0, None, None, "\"x\"}"),
            ],
        );
        assert_eq!(deltas.len(), 6);

        let resp = acc.finish();
        let calls = resp.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "call_a");
        assert_eq!(calls[0].kind, "function");
        assert_eq!(calls[0].function.name, "search");
        assert_eq!(calls[0].function.arguments, "{\"q\":\"x\"}");
        assert_eq!(calls[1].id, "call_b");
        assert_eq!(calls[1].function.name, "fetch");
        assert_eq!(calls[1].function.arguments, "{\"url\":1}");
    }

    #[test]
    fn two_streams_in_order_0_1_0_1_1() {
        let mut acc = StreamAccumulator::new();
        feed_all(
            &mut acc,
            &[
                tool_chunk(0, Some("call_0"), Some("a"), "{\"x\""),
                tool_chunk(1, Some("call_1"), Some("b"), "{\"y\""),
                tool_chunk(0, None, None, ":0}"),
                tool_chunk(1, None, None, ":"),
                tool_chunk(1, None, None, "1}"),
            ],
        );
        let calls = acc.response().tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!((calls[0].index, calls[1].index), (0, 1));
        assert_eq!(calls[0].function.arguments, "{\"x\":0}");
        assert_eq!(calls[1].function.arguments, "{\"y\":1}");
    }

    #[test]
    fn slots_keep_first_seen_order() {
        let mut acc = StreamAccumulator::new();
        feed_all(
            &mut acc,
            &[
                tool_chunk(3, Some("late"), Some("b"), "{}"),
                tool_chunk(1, Some("early"), Some("a"), "{}"),
            ],
        );
        let calls = acc.response().tool_calls();
        assert_eq!(calls[0].index, 3);
        assert_eq!(calls[1].index, 1);
    }

    #[test]
    fn identity_survives_fragments_that_omit_it() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(&tool_chunk(0, Some("call_1"), Some("lookup"), "{"));
        acc.feed_line(
            r#"data: {"id":"chatcmpl-1","choices":[{"index":0,"delta":{"tool_calls":[{"index":0,"id":"","function":{"name":"","arguments":"}"}}]}}]}"#,
        );
        let call = &acc.response().tool_calls()[0];
        assert_eq!(call.id, "call_1");
        assert_eq!(call.function.name, "lookup");
        assert_eq!(call.function.arguments, "{}");
    }

    #[test]
    fn tool_call_delta_reports_accumulated_identity_and_fragment_arguments() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(&tool_chunk(0, Some("call_1"), Some("lookup"), "{\"a\""));
        let LineOutcome::Applied(deltas) = acc.feed_line(&tool_chunk(0, None, None, ":1}")) else {
            panic!("expected Applied");
        };
        assert_eq!(
            deltas,
            vec![StreamDelta::ToolCall {
                index: 0,
                call_id: "call_1".into(),
                name: "lookup".into(),
                arguments: ":1}".into(),
            }]
        );
    }

    #[test]
    fn finish_reason_before_any_delta_creates_the_message() {
        let mut acc = StreamAccumulator::new();
        let LineOutcome::Applied(deltas) = acc.feed_line(
            r#"data: {"id":"c","model":"m","choices":[{"index":0,"delta":{},"finish_reason":"length"}]}"#,
        ) else {
            panic!("expected Applied");
        };
        assert!(deltas.is_empty());
        let resp = acc.finish();
        assert_eq!(resp.choices.len(), 1);
        assert_eq!(resp.finish_reason(), Some("length"));
        assert_eq!(resp.message().unwrap().role, "assistant");
        assert!(resp.message().unwrap().content.is_none());
    }

    #[test]
    fn finish_reason_is_last_write_wins() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(r#"data: {"id":"c","choices":[{"delta":{"content":"x"},"finish_reason":"tool_calls"}]}"#);
        acc.feed_line(r#"data: {"id":"c","choices":[{"delta":{},"finish_reason":"stop"}]}"#);
        acc.feed_line(r#"data: {"id":"c","choices":[{"delta":{},"finish_reason":null}]}"#);
        assert_eq!(acc.response().finish_reason(), Some("stop"));
    }

    #[test]
    fn only_first_choice_is_read() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(
            r#"data: {"id":"c","choices":[{"index":0,"delta":{"content":"a"}},{"index":1,"delta":{"content":"b"}}]}"#,
        );
        assert_eq!(acc.response().choices.len(), 1);
        assert_eq!(acc.response().content(), "a");
    }

    #[test]
    fn usage_is_captured_from_trailing_chunk() {
        let mut acc = StreamAccumulator::new();
        acc.feed_line(&text_chunk("c", "hi"));
        acc.feed_line(
            r#"data: {"id":"c","choices":[],"usage":{"prompt_tokens":7,"completion_tokens":2,"total_tokens":9}}"#,
        );
        let usage = acc.response().usage.unwrap();
        assert_eq!(usage.prompt_tokens, 7);
        assert_eq!(usage.total_tokens, 9);
    }

    #[test]
    fn empty_stream_yields_empty_response() {
        let acc = StreamAccumulator::new();
        let resp = acc.finish();
        assert!(resp.id.is_empty());
        assert!(resp.choices.is_empty());
    }

    proptest! {
        // Arguments reassemble exactly regardless of how the text is split.
        #[test]
        fn arguments_reassemble_for_any_split(
            args in "[a-z0-9{}:\",]{0,40}",
            cuts in proptest::collection::vec(0usize..40, 0..6),
        ) {
            let mut points: Vec<usize> = cuts
                .into_iter()
                .map(|c| c.min(args.len()))
                .collect();
            points.push(0);
            points.push(args.len());
            points.sort_unstable();
            points.dedup();

            let mut acc = StreamAccumulator::new();
            acc.feed_line(&tool_chunk(0, Some("call_1"), Some("f"), ""));
            for pair in points.windows(2) {
                acc.feed_line(&tool_chunk(0, None, None, &args[pair[0]..pair[1]]));
            }
            prop_assert_eq!(&acc.response().tool_calls()[0].function.arguments, &args);
        }
    }
}
