// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider trait for chat-completion backends.

use async_trait::async_trait;

use crate::error::SeekwireError;
use crate::options::CompletionOptions;
use crate::types::{CompletionRequest, CompletionResponse};

/// A chat-completion backend.
///
/// One call presents as a single awaitable operation that yields the fully
/// assembled response or one error. Intermediate data is only observable
/// through progress events.
#[async_trait]
pub trait Completer: Send + Sync {
    /// Returns the provider name used in logs.
    fn name(&self) -> &str;

    /// Sends a completion request and waits for the assembled response.
    async fn complete(
        &self,
        request: CompletionRequest,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, SeekwireError>;

    /// Like [`complete`](Completer::complete), but accepts several option
    /// sets and folds them with [`CompletionOptions::merge`].
    async fn complete_with(
        &self,
        request: CompletionRequest,
        options: Vec<CompletionOptions>,
    ) -> Result<CompletionResponse, SeekwireError> {
        self.complete(request, CompletionOptions::merge(options)).await
    }
}
