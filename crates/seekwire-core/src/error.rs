// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Seekwire completion providers.

use thiserror::Error;

/// The error type returned by every [`Completer`](crate::traits::Completer) call.
///
/// A call either yields a complete response or exactly one of these.
#[derive(Debug, Error)]
pub enum SeekwireError {
    /// Configuration errors (missing API key, invalid header names or values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The outbound request could not be serialized. Raised before any network I/O.
    #[error("failed to serialize request: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },

    /// Connection-level failure while issuing the HTTP request.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// I/O failure while scanning the streamed response body.
    #[error("failed to read response: {message}")]
    StreamRead {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The caller cancelled the call.
    #[error("completion cancelled")]
    Cancelled,

    /// The caller-supplied deadline elapsed.
    #[error("completion timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },
}

impl SeekwireError {
    /// Returns true when the call ended because the caller gave up on it.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Timeout { .. })
    }
}
