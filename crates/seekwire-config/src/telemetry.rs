// SPDX-FileCopyrightText: 2026 Seekwire Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Global `tracing` subscriber setup.

use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` if set, else seekwire crates at `level`
/// and everything else at `warn`.
pub fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "seekwire_core={level},seekwire_config={level},seekwire_deepseek={level},warn"
        ))
    })
}

/// Installs a formatted subscriber as the global default.
///
/// Returns `false` if a global subscriber was already installed, which is
/// the normal case in tests and embedding applications.
pub fn init_tracing(level: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_thread_names(false)
        .try_init()
        .is_ok()
}
