// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit sink for raw provider payloads.

use strum::Display;

/// Which way a logged payload travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Request body sent to the provider.
    Outbound,
    /// Final response assembled from the provider.
    Inbound,
}

/// Receives raw request/response payloads for auditing.
///
/// Implementations swallow their own failures; logging never affects the call.
pub trait MessageLog: Send + Sync {
    fn log(&self, source: &str, direction: Direction, payload: &[u8]);
}

/// Discards every payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMessageLog;

impl MessageLog for NoopMessageLog {
    fn log(&self, _source: &str, _direction: Direction, _payload: &[u8]) {}
}

/// Emits payloads as `debug` records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMessageLog;

impl MessageLog for TracingMessageLog {
    fn log(&self, source: &str, direction: Direction, payload: &[u8]) {
        tracing::debug!(
            source,
            direction = %direction,
            bytes = payload.len(),
            payload = %String::from_utf8_lossy(payload),
            "provider message"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Outbound.to_string(), "outbound");
        assert_eq!(Direction::Inbound.to_string(), "inbound");
    }

    #[traced_test]
    #[test]
    fn tracing_log_records_payload() {
        TracingMessageLog.log("deepseek-api", Direction::Outbound, br#"{"model":"x"}"#);
        assert!(logs_contain("provider message"));
        assert!(logs_contain("deepseek-api"));
    }
}
