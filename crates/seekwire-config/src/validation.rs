// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SeekwireConfig;

/// Level names accepted in `logging.level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &SeekwireConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.deepseek.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        errors.push(ConfigError::Validation {
            message: format!("deepseek.base_url must be an http(s) URL, got `{base_url}`"),
        });
    }

    if config.deepseek.default_model.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "deepseek.default_model must not be empty".to_string(),
        });
    }

    if config.deepseek.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "deepseek.request_timeout_secs must be greater than 0".to_string(),
        });
    }

    for name in config.deepseek.headers.keys() {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: "deepseek.headers contains an empty header name".to_string(),
            });
        }
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.logging.level
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
