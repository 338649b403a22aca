// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion between the generic completion model and the DeepSeek wire format.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use seekwire_core::{
    CompletionItem, CompletionProgress, CompletionRequest, CompletionResponse, Content,
    EmbeddedResource, ItemBody, Message, Role, TokenUsage, ToolCall,
};
use tracing::warn;

use crate::accumulator::StreamDelta;
use crate::types::{
    ChatCompletionRequest, ChatCompletionResponse, FunctionCall, FunctionDefinition, ToolChoice,
    ToolChoiceMode, WireMessage, WireTool, WireToolCall,
};

/// Used when the request leaves `max_tokens` at zero.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Stand-in text for image blocks, which the text-only API cannot carry.
pub const IMAGE_PLACEHOLDER: &str = "[Image content not supported in text format]";

/// MIME types whose resource bodies are inlined as text.
pub const TEXT_MIME_TYPES: &[&str] = &[
    "text/plain",
    "text/markdown",
    "text/html",
    "text/css",
    "text/csv",
    "text/xml",
    "text/javascript",
    "text/x-python",
    "text/x-rust",
    "text/x-go",
    "text/x-shellscript",
    "application/json",
    "application/xml",
    "application/yaml",
    "application/x-yaml",
    "application/toml",
    "application/javascript",
    "application/x-sh",
];

/// True if `mime_type` (parameters after `;` ignored) names a text format.
pub fn is_text_mime_type(mime_type: &str) -> bool {
    let essence = mime_type.split(';').next().unwrap_or_default().trim();
    TEXT_MIME_TYPES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(essence))
}

/// `<response id>-<slot>`, the item id shared by progress events and the final response.
pub fn item_id(response_id: &str, slot: usize) -> String {
    format!("{response_id}-{slot}")
}

/// Builds the wire request for a generic completion request.
///
/// Pure and total: the same request always yields the same wire request.
/// `stream` is left false; the transport sets it.
pub fn to_request(request: &CompletionRequest) -> ChatCompletionRequest {
    let mut messages = Vec::with_capacity(request.input.len() + 1);

    let system_prompt = request.system_prompt.trim();
    if !system_prompt.is_empty() {
        messages.push(WireMessage::text(Role::System.to_string(), system_prompt));
    }

    for message in &request.input {
        append_message(&mut messages, message);
    }

    let tools = request
        .tools
        .iter()
        .map(|tool| WireTool {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: tool.parameters.clone(),
            },
        })
        .collect();

    ChatCompletionRequest {
        model: request.model.clone(),
        messages,
        temperature: number_to_f64(request.temperature.as_ref()),
        top_p: number_to_f64(request.top_p.as_ref()),
        max_tokens: if request.max_tokens == 0 {
            DEFAULT_MAX_TOKENS
        } else {
            request.max_tokens
        },
        stream: false,
        tools,
        tool_choice: to_tool_choice(&request.tool_choice),
    }
}

fn number_to_f64(number: Option<&serde_json::Number>) -> f64 {
    number.and_then(serde_json::Number::as_f64).unwrap_or_default()
}

/// Maps a tool-choice directive. Anything other than the three modes names a tool.
pub fn to_tool_choice(choice: &str) -> Option<ToolChoice> {
    match choice {
        "" => None,
        "auto" => Some(ToolChoice::Mode(ToolChoiceMode::Auto)),
        "none" => Some(ToolChoice::Mode(ToolChoiceMode::None)),
        "required" => Some(ToolChoice::Mode(ToolChoiceMode::Required)),
        name => Some(ToolChoice::function(name)),
    }
}

/// Appends the wire messages for one input message, one per item.
fn append_message(out: &mut Vec<WireMessage>, message: &Message) {
    let role = message.role.to_string();
    for item in &message.items {
        match &item.body {
            ItemBody::Content(content) => {
                let text = convert_content(content);
                if !text.is_empty() {
                    out.push(WireMessage::text(role.clone(), text));
                }
            }
            ItemBody::ToolCall(call) => out.push(WireMessage {
                role: Role::Assistant.to_string(),
                tool_calls: vec![WireToolCall {
                    id: call.call_id.clone(),
                    kind: "function".to_string(),
                    index: 0,
                    function: FunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                }],
                ..Default::default()
            }),
            ItemBody::ToolCallResult(result) => {
                let text = result
                    .output
                    .content
                    .iter()
                    .filter_map(Content::as_text)
                    .collect::<Vec<_>>()
                    .join("\n");
                out.push(WireMessage {
                    role: Role::Tool.to_string(),
                    content: Some(text),
                    tool_call_id: Some(result.call_id.clone()),
                    ..Default::default()
                });
            }
        }
    }
}

/// Renders one content block as plain text. Empty means "emit nothing".
pub fn convert_content(content: &Content) -> String {
    match content {
        Content::Text { text } => text.clone(),
        Content::Image { .. } => IMAGE_PLACEHOLDER.to_string(),
        Content::Audio { .. } => String::new(),
        Content::Resource { resource } => convert_resource(resource),
    }
}

fn convert_resource(resource: &EmbeddedResource) -> String {
    if !resource.is_for_assistant() {
        return String::new();
    }
    let is_text = resource.mime_type.as_deref().is_some_and(is_text_mime_type);
    if is_text && let Some(text) = resource_text(resource) {
        return text;
    }
    format!("[Resource: {}]", resource.uri)
}

/// The resource body as text: the decoded blob if present, else `text`.
fn resource_text(resource: &EmbeddedResource) -> Option<String> {
    if let Some(blob) = resource.blob.as_deref().filter(|b| !b.is_empty()) {
        let decoded = STANDARD
            .decode(blob)
            .map_err(|e| e.to_string())
            .and_then(|bytes| String::from_utf8(bytes).map_err(|e| e.to_string()));
        return match decoded {
            Ok(text) => Some(text),
            Err(error) => {
                warn!(uri = %resource.uri, error = %error, "resource blob is not base64 text");
                None
            }
        };
    }
    resource.text.clone().filter(|t| !t.is_empty())
}

/// Converts an assembled wire response into the generic response.
///
/// Items are the text content at slot 0, then one item per tool call at its
/// stream index. A response with no choices yields an empty assistant message.
pub fn to_response(response: &ChatCompletionResponse, created: DateTime<Utc>) -> CompletionResponse {
    let mut output = Message {
        id: response.id.clone(),
        role: Role::Assistant,
        created: Some(created),
        items: Vec::new(),
    };

    let content = response.content();
    if !content.is_empty() {
        output.items.push(CompletionItem::content(
            item_id(&response.id, 0),
            Content::text(content),
        ));
    }
    for call in response.tool_calls() {
        output.items.push(CompletionItem::tool_call(
            item_id(&response.id, call.index),
            ToolCall {
                call_id: call.id.clone(),
                name: call.function.name.clone(),
                arguments: call.function.arguments.clone(),
            },
        ));
    }

    CompletionResponse {
        model: response.model.clone(),
        output,
        finish_reason: response.finish_reason().map(str::to_string),
        usage: response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        }),
    }
}

/// Builds the progress event describing one applied increment.
pub fn to_progress(
    delta: &StreamDelta,
    response: &ChatCompletionResponse,
    agent: &str,
) -> CompletionProgress {
    let item = match delta {
        StreamDelta::Text { text } => {
            CompletionItem::content(item_id(&response.id, 0), Content::text(text.clone()))
        }
        StreamDelta::ToolCall {
            index,
            call_id,
            name,
            arguments,
        } => CompletionItem::tool_call(
            item_id(&response.id, *index),
            ToolCall {
                call_id: call_id.clone(),
                name: name.clone(),
                arguments: arguments.clone(),
            },
        ),
    };

    CompletionProgress {
        model: response.model.clone(),
        agent: agent.to_string(),
        message_id: response.id.clone(),
        item: item.streaming(),
    }
}
