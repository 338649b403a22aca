// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! DeepSeek chat-completions provider for Seekwire.
//!
//! [`DeepSeekProvider`] implements [`Completer`]: it translates a generic
//! request to the DeepSeek wire format, streams the response over SSE,
//! reports each increment to a [`ProgressSink`], and returns the assembled
//! generic response.

pub mod accumulator;
pub mod client;
pub mod sse;
pub mod translate;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use seekwire_config::SeekwireConfig;
use seekwire_core::{
    Completer, CompletionOptions, CompletionRequest, CompletionResponse, Direction, MessageLog,
    NoopProgressSink, ProgressSink, ProgressToken, SeekwireError, TracingMessageLog,
};
use tracing::{debug, info, warn};

use crate::accumulator::{LineOutcome, StreamAccumulator, StreamDelta};
use crate::client::{ClientSettings, DeepSeekClient};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

pub use crate::client::DEFAULT_BASE_URL;

/// Source tag attached to every payload handed to the [`MessageLog`].
pub const MESSAGE_SOURCE: &str = "deepseek-api";

/// Environment variable consulted when the config has no API key.
pub const API_KEY_ENV: &str = "DEEPSEEK_API_KEY";

/// DeepSeek provider implementing [`Completer`].
///
/// Stateless between calls; one instance may serve concurrent completions.
pub struct DeepSeekProvider {
    client: DeepSeekClient,
    default_model: String,
    progress: Arc<dyn ProgressSink>,
    message_log: Arc<dyn MessageLog>,
}

impl DeepSeekProvider {
    /// Wraps a client. Progress is discarded and payloads go to `tracing`
    /// until replaced with the `with_*` builders.
    pub fn new(client: DeepSeekClient) -> Self {
        Self {
            client,
            default_model: String::new(),
            progress: Arc::new(NoopProgressSink),
            message_log: Arc::new(TracingMessageLog),
        }
    }

    /// Builds a provider from the `[deepseek]` config section.
    ///
    /// # API Key Resolution
    /// 1. `deepseek.api_key` if set and non-empty
    /// 2. `DEEPSEEK_API_KEY` environment variable
    /// 3. None, which is only accepted when `deepseek.headers` supplies `Authorization`
    pub fn from_config(config: &SeekwireConfig) -> Result<Self, SeekwireError> {
        let deepseek = &config.deepseek;
        let api_key = resolve_api_key(deepseek.api_key.as_deref());
        let has_auth_header = deepseek
            .headers
            .keys()
            .any(|name| name.trim().eq_ignore_ascii_case("authorization"));
        if api_key.is_none() && !has_auth_header {
            return Err(SeekwireError::Config(format!(
                "DeepSeek API key not found. Set deepseek.api_key in config or the {API_KEY_ENV} environment variable."
            )));
        }

        let client = DeepSeekClient::new(ClientSettings {
            api_key,
            base_url: deepseek.base_url.clone(),
            headers: deepseek.headers.clone(),
            timeout: Some(Duration::from_secs(deepseek.request_timeout_secs)),
        })?;

        info!(
            model = %deepseek.default_model,
            endpoint = %client.endpoint(),
            "DeepSeek provider initialized"
        );

        Ok(Self::new(client).with_default_model(deepseek.default_model.clone()))
    }

    /// Model used when a request leaves `model` empty.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    pub fn with_message_log(mut self, log: Arc<dyn MessageLog>) -> Self {
        self.message_log = log;
        self
    }

    /// Sends the request and folds the stream until `[DONE]` or end of body.
    async fn stream_completion(
        &self,
        agent: &str,
        mut request: ChatCompletionRequest,
        progress_token: Option<&ProgressToken>,
    ) -> Result<ChatCompletionResponse, SeekwireError> {
        request.stream = true;
        let body = serde_json::to_vec(&request)?;
        self.message_log.log(MESSAGE_SOURCE, Direction::Outbound, &body);

        let mut lines = self.client.open_stream(body).await?;
        let mut accumulator = StreamAccumulator::new();

        while let Some(line) = lines.next().await {
            let line = line?;
            match accumulator.feed_line(&line) {
                LineOutcome::Ignored => {}
                LineOutcome::Done => break,
                LineOutcome::Malformed(error) => {
                    warn!(error = %error, payload = %error.payload, "skipping malformed stream chunk");
                }
                LineOutcome::Applied(deltas) => {
                    if let Some(token) = progress_token {
                        self.emit_progress(agent, accumulator.response(), deltas, token);
                    }
                }
            }
        }

        let response = accumulator.finish();
        debug!(
            id = %response.id,
            finish_reason = response.finish_reason().unwrap_or_default(),
            tool_calls = response.tool_calls().len(),
            "stream complete"
        );
        match serde_json::to_vec(&response) {
            Ok(bytes) => self.message_log.log(MESSAGE_SOURCE, Direction::Inbound, &bytes),
            Err(e) => debug!(error = %e, "failed to encode response for message log"),
        }
        Ok(response)
    }

    fn emit_progress(
        &self,
        agent: &str,
        response: &ChatCompletionResponse,
        deltas: Vec<StreamDelta>,
        token: &ProgressToken,
    ) {
        for delta in &deltas {
            self.progress
                .send(translate::to_progress(delta, response, agent), token);
        }
    }
}

#[async_trait]
impl Completer for DeepSeekProvider {
    fn name(&self) -> &str {
        "deepseek"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, SeekwireError> {
        let mut wire = translate::to_request(&request);
        if wire.model.is_empty() {
            wire.model = self.default_model.clone();
        }
        let created = Utc::now();
        debug!(
            model = %wire.model,
            messages = wire.messages.len(),
            tools = wire.tools.len(),
            "sending completion request"
        );

        let cancel = options.cancellation_token();
        let call = async {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(SeekwireError::Cancelled),
                result = self.stream_completion(&request.agent, wire, options.progress_token.as_ref()) => result,
            }
        };
        let response = match options.timeout {
            Some(duration) => tokio::time::timeout(duration, call)
                .await
                .map_err(|_| SeekwireError::Timeout { duration })??,
            None => call.await?,
        };

        Ok(translate::to_response(&response, created))
    }
}

/// Returns the configured key if non-empty, else `DEEPSEEK_API_KEY` if non-empty.
fn resolve_api_key(config_key: Option<&str>) -> Option<String> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Some(key.to_string());
    }
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}
