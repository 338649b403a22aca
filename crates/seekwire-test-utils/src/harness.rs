// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A wiremock server standing in for the chat-completions endpoint.

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use crate::fixtures;

/// Path the server answers on.
pub const COMPLETIONS_PATH: &str = "/chat/completions";

/// A mock DeepSeek endpoint. Point a client's base URL at [`StreamServer::uri`].
pub struct StreamServer {
    server: MockServer,
}

impl StreamServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to configure the client with.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying server, for custom mocks and request inspection.
    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Answers with `body` as an event stream.
    pub async fn respond_with_body(&self, body: impl Into<String>) {
        self.mount(stream_template(body.into())).await;
    }

    /// Answers with raw bytes as an event stream, for bodies that are not valid UTF-8.
    pub async fn respond_with_bytes(&self, body: impl Into<Vec<u8>>) {
        self.mount(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_bytes(body.into()),
        )
        .await;
    }

    /// Answers with the given chunks followed by `[DONE]`.
    pub async fn respond_with_chunks(&self, chunks: &[Value]) {
        self.respond_with_body(fixtures::sse_body(chunks)).await;
    }

    /// Answers with the given chunks after `delay`.
    pub async fn respond_with_delay(&self, chunks: &[Value], delay: Duration) {
        self.mount(stream_template(fixtures::sse_body(chunks)).set_delay(delay))
            .await;
    }

    /// Answers with a non-success status and body.
    pub async fn respond_with_status(&self, status: u16, body: impl Into<String>) {
        self.mount(ResponseTemplate::new(status).set_body_string(body.into()))
            .await;
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// The JSON body of the first request received.
    pub async fn first_request_json(&self) -> Option<Value> {
        self.requests()
            .await
            .first()
            .and_then(|r| serde_json::from_slice(&r.body).ok())
    }

    async fn mount(&self, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(COMPLETIONS_PATH))
            .respond_with(template)
            .mount(&self.server)
            .await;
    }
}

fn stream_template(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/event-stream")
        .set_body_string(body)
}
