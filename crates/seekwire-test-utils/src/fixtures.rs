// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for streamed chat-completion bodies.
//!
//! Every chunk builder returns the chunk's JSON; [`sse_body`] frames chunks
//! as `data:` events and appends the `[DONE]` sentinel.

use serde_json::{Value, json};

/// Model name used by every fixture chunk.
pub const MODEL: &str = "deepseek-chat";

fn chunk(id: &str, delta: Value, finish_reason: Option<&str>) -> Value {
    json!({
        "id": id,
        "object": "chat.completion.chunk",
        "created": 1_700_000_000,
        "model": MODEL,
        "choices": [{"index": 0, "delta": delta, "finish_reason": finish_reason}]
    })
}

/// A chunk carrying a text delta.
pub fn text_chunk(id: &str, text: &str) -> Value {
    chunk(id, json!({"role": "assistant", "content": text}), None)
}

/// The opening fragment of a tool call, carrying its id and name.
pub fn tool_call_start(id: &str, index: usize, call_id: &str, name: &str) -> Value {
    chunk(
        id,
        json!({"tool_calls": [{
            "index": index,
            "id": call_id,
            "type": "function",
            "function": {"name": name, "arguments": ""}
        }]}),
        None,
    )
}

/// A follow-up fragment carrying only argument text.
pub fn tool_call_args(id: &str, index: usize, arguments: &str) -> Value {
    chunk(
        id,
        json!({"tool_calls": [{"index": index, "function": {"arguments": arguments}}]}),
        None,
    )
}

/// A chunk with an empty delta and a finish reason.
pub fn finish_chunk(id: &str, reason: &str) -> Value {
    chunk(id, json!({}), Some(reason))
}

/// A trailing chunk reporting token usage and no choices.
pub fn usage_chunk(id: &str, prompt: u32, completion: u32) -> Value {
    json!({
        "id": id,
        "object": "chat.completion.chunk",
        "model": MODEL,
        "choices": [],
        "usage": {
            "prompt_tokens": prompt,
            "completion_tokens": completion,
            "total_tokens": prompt + completion
        }
    })
}

/// `data: <json>` for one chunk.
pub fn data_line(chunk: &Value) -> String {
    format!("data: {chunk}")
}

/// Frames chunks as SSE events (blank line between) and terminates with `[DONE]`.
pub fn sse_body(chunks: &[Value]) -> String {
    let mut body = sse_body_unterminated(chunks);
    body.push_str("data: [DONE]\n\n");
    body
}

/// Like [`sse_body`] but without the `[DONE]` sentinel.
pub fn sse_body_unterminated(chunks: &[Value]) -> String {
    chunks
        .iter()
        .map(|c| format!("{}\n\n", data_line(c)))
        .collect()
}
