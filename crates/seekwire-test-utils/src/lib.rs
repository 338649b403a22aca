// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Seekwire provider tests.
//!
//! # Components
//!
//! - [`RecordingProgressSink`] / [`RecordingMessageLog`] - capture what a provider emits
//! - [`fixtures`] - builders for streamed chunk lines
//! - [`StreamServer`] - wiremock server answering `POST /chat/completions`

pub mod fixtures;
pub mod harness;
pub mod recording;

pub use harness::StreamServer;
pub use recording::{LoggedMessage, RecordingMessageLog, RecordingProgressSink};
