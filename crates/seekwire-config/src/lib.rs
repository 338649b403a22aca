// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for Seekwire providers.
//!
//! TOML files and `SEEKWIRE_*` environment variables are merged with Figment,
//! checked with `deny_unknown_fields` plus semantic validation, and reported
//! as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use seekwire_config::{load_and_validate, render_errors};
//!
//! let config = match load_and_validate() {
//!     Ok(config) => config,
//!     Err(errors) => {
//!         render_errors(&errors);
//!         std::process::exit(2);
//!     }
//! };
//! seekwire_config::init_tracing(&config.logging.level);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod telemetry;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{DeepSeekConfig, LoggingConfig, SeekwireConfig};
pub use telemetry::init_tracing;

/// Load configuration from the file hierarchy and environment, then validate it.
pub fn load_and_validate() -> Result<SeekwireConfig, Vec<ConfigError>> {
    finish(loader::load_config())
}

/// Load configuration from an explicit file (plus environment) and validate it.
pub fn load_and_validate_path(path: &Path) -> Result<SeekwireConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_path(path))
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<SeekwireConfig, Vec<ConfigError>> {
    finish(loader::load_config_from_str(toml_content))
}

#[allow(clippy::result_large_err)]
fn finish(
    loaded: Result<SeekwireConfig, figment::Error>,
) -> Result<SeekwireConfig, Vec<ConfigError>> {
    let config = loaded.map_err(diagnostic::figment_to_config_errors)?;
    validation::validate_config(&config)?;
    tracing::debug!(
        base_url = %config.deepseek.base_url,
        default_model = %config.deepseek.default_model,
        "configuration loaded"
    );
    Ok(config)
}
