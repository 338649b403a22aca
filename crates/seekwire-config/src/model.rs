// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at load time instead of being silently ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level Seekwire configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SeekwireConfig {
    /// DeepSeek API settings.
    #[serde(default)]
    pub deepseek: DeepSeekConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// DeepSeek API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeepSeekConfig {
    /// API key. `None` falls back to the `DEEPSEEK_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL the `/chat/completions` path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used when a request leaves `model` empty.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Extra headers sent on every request. An explicit `Authorization` or
    /// `Content-Type` here wins over the generated one.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Whole-request HTTP timeout, including the streamed body.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            default_model: default_model(),
            headers: BTreeMap::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.deepseek.com/v1".to_string()
}

fn default_model() -> String {
    "deepseek-chat".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default level for seekwire crates when `RUST_LOG` is unset.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_public_endpoint() {
        let config = SeekwireConfig::default();
        assert_eq!(config.deepseek.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.deepseek.default_model, "deepseek-chat");
        assert_eq!(config.deepseek.request_timeout_secs, 300);
        assert!(config.deepseek.api_key.is_none());
        assert!(config.deepseek.headers.is_empty());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_section_fills_defaults() {
        let config: SeekwireConfig = toml::from_str("[deepseek]\napi_key = \"sk-1\"\n").unwrap();
        assert_eq!(config.deepseek.api_key.as_deref(), Some("sk-1"));
        assert_eq!(config.deepseek.default_model, "deepseek-chat");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result: Result<SeekwireConfig, _> = toml::from_str("[deepseek]\nbase_ulr = \"x\"\n");
        assert!(result.is_err());
    }
}
