// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider-agnostic completion types shared by every Seekwire provider.
//!
//! Content blocks follow the MCP content shape (`type`-tagged, camelCase
//! field names) so tool results and embedded resources can be passed through
//! from MCP servers unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// The author of a message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Opaque token addressing where progress events for a call are routed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressToken(pub String);

impl From<&str> for ProgressToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProgressToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

// --- Content blocks ---

/// Audience and priority hints attached to a resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotations {
    /// Who the resource is intended for.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audience: Vec<Role>,
    /// Relative importance, 0.0 to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

/// A resource embedded in a content block, carrying either text or a base64 blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedResource {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base64-encoded body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blob: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

impl EmbeddedResource {
    /// Returns true if the resource is explicitly addressed to the assistant.
    pub fn is_for_assistant(&self) -> bool {
        self.annotations
            .as_ref()
            .is_some_and(|a| a.audience.contains(&Role::Assistant))
    }
}

/// A single block of message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text {
        text: String,
    },
    Image {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Audio {
        data: String,
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
    Resource {
        resource: EmbeddedResource,
    },
}

impl Content {
    /// Creates a text content block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Returns the text if this is a text block.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            _ => None,
        }
    }
}

// --- Tool calls ---

/// A request from the model to invoke a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier correlating the call with its result.
    pub call_id: String,
    pub name: String,
    /// JSON-encoded arguments. Treated as opaque text while streaming.
    pub arguments: String,
}

/// Output of a tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallResult {
    #[serde(default)]
    pub content: Vec<Content>,
    #[serde(default)]
    pub is_error: bool,
}

/// The result of a tool invocation, sent back to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub call_id: String,
    pub output: CallResult,
}

/// Tool description offered to the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON Schema of the tool's arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,
}

// --- Messages ---

/// The payload of a [`CompletionItem`]. Exactly one per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemBody {
    Content(Content),
    ToolCall(ToolCall),
    ToolCallResult(ToolCallResult),
}

/// One ordered entry of a [`Message`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionItem {
    #[serde(default)]
    pub id: String,
    /// True while the item is still being streamed.
    #[serde(default)]
    pub partial: bool,
    /// True if more fragments for this item are expected.
    #[serde(default)]
    pub has_more: bool,
    #[serde(flatten)]
    pub body: ItemBody,
}

impl CompletionItem {
    /// Creates a complete content item.
    pub fn content(id: impl Into<String>, content: Content) -> Self {
        Self {
            id: id.into(),
            partial: false,
            has_more: false,
            body: ItemBody::Content(content),
        }
    }

    /// Creates a complete tool call item.
    pub fn tool_call(id: impl Into<String>, call: ToolCall) -> Self {
        Self {
            id: id.into(),
            partial: false,
            has_more: false,
            body: ItemBody::ToolCall(call),
        }
    }

    /// Creates a complete tool result item.
    pub fn tool_call_result(id: impl Into<String>, result: ToolCallResult) -> Self {
        Self {
            id: id.into(),
            partial: false,
            has_more: false,
            body: ItemBody::ToolCallResult(result),
        }
    }

    /// Marks the item as an in-flight streaming fragment.
    pub fn streaming(mut self) -> Self {
        self.partial = true;
        self.has_more = true;
        self
    }

    pub fn as_content(&self) -> Option<&Content> {
        match &self.body {
            ItemBody::Content(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match &self.body {
            ItemBody::ToolCall(tc) => Some(tc),
            _ => None,
        }
    }
}

/// A message in a conversation: a role and an ordered list of items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub items: Vec<CompletionItem>,
}

impl Message {
    /// Creates a message with no items.
    pub fn new(role: Role) -> Self {
        Self {
            id: String::new(),
            role,
            created: None,
            items: Vec::new(),
        }
    }

    /// Creates a message holding a single text block.
    pub fn text(role: Role, text: impl Into<String>) -> Self {
        Self::new(role).with_item(CompletionItem::content("", Content::text(text)))
    }

    pub fn with_item(mut self, item: CompletionItem) -> Self {
        self.items.push(item);
        self
    }

    /// Concatenates every text block in the message.
    pub fn text_content(&self) -> String {
        self.items
            .iter()
            .filter_map(|item| item.as_content().and_then(Content::as_text))
            .collect()
    }

    /// Returns the tool calls in item order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.items.iter().filter_map(CompletionItem::as_tool_call)
    }
}

// --- Request / response ---

/// A provider-agnostic completion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionRequest {
    pub model: String,
    /// Agent identifier copied into every progress event.
    pub agent: String,
    pub system_prompt: String,
    /// Zero means "provider default".
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<serde_json::Number>,
    pub tools: Vec<ToolDefinition>,
    /// `auto`, `none`, `required`, a tool name, or empty for no directive.
    pub tool_choice: String,
    pub input: Vec<Message>,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A provider-agnostic completion response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub model: String,
    pub output: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

/// A streaming progress notification describing one assembly increment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionProgress {
    pub model: String,
    pub agent: String,
    pub message_id: String,
    pub item: CompletionItem,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_display_and_parse() {
        for role in [Role::System, Role::User, Role::Assistant, Role::Tool] {
            let s = role.to_string();
            assert_eq!(Role::from_str(&s).unwrap(), role);
        }
        assert_eq!(serde_json::to_string(&Role::Assistant).unwrap(), "\"assistant\"");
    }

    #[test]
    fn content_uses_mcp_shape() {
        let json = serde_json::json!({
            "type": "resource",
            "resource": {
                "uri": "file:///notes.md",
                "mimeType": "text/markdown",
                "text": "# notes",
                "annotations": {"audience": ["assistant"]}
            }
        });
        let content: Content = serde_json::from_value(json).unwrap();
        match content {
            Content::Resource { resource } => {
                assert_eq!(resource.mime_type.as_deref(), Some("text/markdown"));
                assert!(resource.is_for_assistant());
            }
            other => panic!("expected resource, got {other:?}"),
        }

        let image = serde_json::to_value(Content::Image {
            data: "AAAA".into(),
            mime_type: "image/png".into(),
        })
        .unwrap();
        assert_eq!(image["type"], "image");
        assert_eq!(image["mimeType"], "image/png");
    }

    #[test]
    fn resource_without_annotations_is_not_for_assistant() {
        let resource = EmbeddedResource {
            uri: "file:///a".into(),
            ..Default::default()
        };
        assert!(!resource.is_for_assistant());
    }

    #[test]
    fn completion_item_body_is_flattened() {
        let item = CompletionItem::tool_call(
            "resp-1",
            ToolCall {
                call_id: "call_1".into(),
                name: "search".into(),
                arguments: "{}".into(),
            },
        )
        .streaming();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], "resp-1");
        assert_eq!(json["partial"], true);
        assert_eq!(json["has_more"], true);
        assert_eq!(json["tool_call"]["name"], "search");

        let back: CompletionItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn message_text_content_skips_non_text_items() {
        let msg = Message::text(Role::Assistant, "Hello, ")
            .with_item(CompletionItem::tool_call("x", ToolCall::default()))
            .with_item(CompletionItem::content("y", Content::text("world")));
        assert_eq!(msg.text_content(), "Hello, world");
        assert_eq!(msg.tool_calls().count(), 1);
    }

    #[test]
    fn completion_request_defaults_when_fields_missing() {
        let req: CompletionRequest =
            serde_json::from_value(serde_json::json!({"model": "deepseek-chat"})).unwrap();
        assert_eq!(req.model, "deepseek-chat");
        assert_eq!(req.max_tokens, 0);
        assert!(req.temperature.is_none());
        assert!(req.tool_choice.is_empty());
    }
}
