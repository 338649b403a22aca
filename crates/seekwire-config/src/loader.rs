// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/seekwire/seekwire.toml`, then
//! `~/.config/seekwire/seekwire.toml`, then `./seekwire.toml`, then
//! `SEEKWIRE_*` environment variables. Later layers win.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SeekwireConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/seekwire/seekwire.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "seekwire.toml";

/// `~/.config/seekwire/seekwire.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("seekwire").join(LOCAL_CONFIG_FILE))
}

/// Load configuration from the standard file hierarchy with env var overrides.
pub fn load_config() -> Result<SeekwireConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<SeekwireConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SeekwireConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SeekwireConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SeekwireConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(SeekwireConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH));
    if let Some(user) = user_config_path() {
        figment = figment.merge(Toml::file(user));
    }
    figment
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `SEEKWIRE_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the section prefix is rewritten, so `SEEKWIRE_DEEPSEEK_API_KEY`
/// becomes `deepseek.api_key` rather than `deepseek.api.key`.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("SEEKWIRE_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    for section in ["deepseek", "logging"] {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}
