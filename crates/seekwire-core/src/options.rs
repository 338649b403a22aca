// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-call options: progress routing, cancellation, and deadline.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::types::ProgressToken;

/// Options supplied alongside a completion request.
///
/// Progress events are only emitted when a `progress_token` is set.
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    pub progress_token: Option<ProgressToken>,
    pub cancellation: Option<CancellationToken>,
    pub timeout: Option<Duration>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress_token(mut self, token: impl Into<ProgressToken>) -> Self {
        self.progress_token = Some(token.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the caller's cancellation token, or a fresh one that is never
    /// cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone().unwrap_or_default()
    }

    /// Folds several option sets into one. Later sets override earlier ones
    /// field by field; unset fields never clear a value.
    pub fn merge(options: impl IntoIterator<Item = CompletionOptions>) -> CompletionOptions {
        options
            .into_iter()
            .fold(CompletionOptions::default(), |mut acc, next| {
                if let Some(token) = next.progress_token
                    && !token.0.is_empty()
                {
                    acc.progress_token = Some(token);
                }
                if next.cancellation.is_some() {
                    acc.cancellation = next.cancellation;
                }
                if next.timeout.is_some() {
                    acc.timeout = next.timeout;
                }
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_of_nothing_is_default() {
        let merged = CompletionOptions::merge(Vec::new());
        assert!(merged.progress_token.is_none());
        assert!(merged.cancellation.is_none());
        assert!(merged.timeout.is_none());
    }

    #[test]
    fn merge_later_values_win() {
        let merged = CompletionOptions::merge([
            CompletionOptions::new()
                .with_progress_token("first")
                .with_timeout(Duration::from_secs(5)),
            CompletionOptions::new().with_progress_token("second"),
        ]);
        assert_eq!(merged.progress_token, Some(ProgressToken::from("second")));
        assert_eq!(merged.timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn merge_ignores_empty_progress_token() {
        let merged = CompletionOptions::merge([
            CompletionOptions::new().with_progress_token("keep"),
            CompletionOptions::new().with_progress_token(""),
        ]);
        assert_eq!(merged.progress_token, Some(ProgressToken::from("keep")));
    }

    #[test]
    fn default_cancellation_token_is_live() {
        let opts = CompletionOptions::new();
        assert!(!opts.cancellation_token().is_cancelled());

        let token = CancellationToken::new();
        let opts = opts.with_cancellation(token.clone());
        token.cancel();
        assert!(opts.cancellation_token().is_cancelled());
    }
}
