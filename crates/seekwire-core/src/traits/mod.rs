// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Seam traits between completion providers and their collaborators.
//!
//! Providers implement [`Completer`]. Progress events and audit payloads leave
//! a provider through [`ProgressSink`] and [`MessageLog`], both fire-and-forget.

pub mod completer;
pub mod message_log;
pub mod progress;

pub use completer::Completer;
pub use message_log::{Direction, MessageLog, NoopMessageLog, TracingMessageLog};
pub use progress::{ChannelProgressSink, NoopProgressSink, ProgressSink, RoutedProgress};
