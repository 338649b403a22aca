// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the DeepSeek chat-completions endpoint.
//!
//! [`DeepSeekClient`] owns header construction and the single streaming POST.
//! It performs no retries: a failed call surfaces its error to the caller.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use seekwire_core::SeekwireError;
use tracing::debug;

use crate::sse::{self, LineStream};

/// Public DeepSeek API root.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Path appended to the base URL.
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Settings for building a [`DeepSeekClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientSettings {
    /// Sent as `Authorization: Bearer <key>` unless `headers` already has one.
    pub api_key: Option<String>,
    /// Empty means [`DEFAULT_BASE_URL`].
    pub base_url: String,
    /// Extra headers for every request.
    pub headers: BTreeMap<String, String>,
    /// Whole-request timeout, streamed body included.
    pub timeout: Option<Duration>,
}

/// HTTP client for DeepSeek API communication.
#[derive(Debug, Clone)]
pub struct DeepSeekClient {
    client: reqwest::Client,
    headers: HeaderMap,
    endpoint: String,
}

impl DeepSeekClient {
    /// Creates a client. Fails on header names or values HTTP cannot carry.
    pub fn new(settings: ClientSettings) -> Result<Self, SeekwireError> {
        let headers = build_headers(settings.api_key.as_deref(), &settings.headers)?;

        let mut builder = reqwest::Client::builder().connect_timeout(Duration::from_secs(30));
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| SeekwireError::Transport {
            message: format!("failed to build HTTP client: {e}"),
            source: Some(Box::new(e)),
        })?;

        let base_url = if settings.base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            settings.base_url.trim()
        };

        Ok(Self {
            client,
            headers,
            endpoint: format!("{}{CHAT_COMPLETIONS_PATH}", base_url.trim_end_matches('/')),
        })
    }

    /// The full chat-completions URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// POSTs an already-serialized streaming request and returns the body as lines.
    ///
    /// Any status outside 2xx becomes [`SeekwireError::Status`] carrying the
    /// response body verbatim.
    pub async fn open_stream(&self, body: Vec<u8>) -> Result<LineStream, SeekwireError> {
        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .body(body)
            .send()
            .await
            .map_err(|e| SeekwireError::Transport {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, endpoint = %self.endpoint, "streaming response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SeekwireError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(sse::line_stream(response))
    }
}

/// Merges configured headers with the generated `Authorization` and
/// `Content-Type`. Configured values win; names match case-insensitively.
fn build_headers(
    api_key: Option<&str>,
    extra: &BTreeMap<String, String>,
) -> Result<HeaderMap, SeekwireError> {
    let mut headers = HeaderMap::new();
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|e| SeekwireError::Config(format!("invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| SeekwireError::Config(format!("invalid value for header `{name}`: {e}")))?;
        headers.insert(name, value);
    }

    if let Some(key) = api_key.filter(|k| !k.is_empty())
        && !headers.contains_key(AUTHORIZATION)
    {
        let mut value = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
            SeekwireError::Config(format!("invalid API key header value: {e}"))
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    if !headers.contains_key(CONTENT_TYPE) {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    Ok(headers)
}
