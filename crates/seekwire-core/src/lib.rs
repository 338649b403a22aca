// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Seekwire.
//!
//! This crate provides the provider-agnostic completion model, the shared
//! error type, per-call options, and the traits providers and their
//! collaborators meet at. Provider crates implement [`Completer`].

pub mod error;
pub mod options;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SeekwireError;
pub use options::CompletionOptions;
pub use types::{
    Annotations, CallResult, CompletionItem, CompletionProgress, CompletionRequest,
    CompletionResponse, Content, EmbeddedResource, ItemBody, Message, ProgressToken, Role,
    TokenUsage, ToolCall, ToolCallResult, ToolDefinition,
};

pub use traits::{
    ChannelProgressSink, Completer, Direction, MessageLog, NoopMessageLog, NoopProgressSink,
    ProgressSink, RoutedProgress, TracingMessageLog,
};
