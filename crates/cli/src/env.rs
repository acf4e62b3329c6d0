// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;

/// Version shown by `fwt --version`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

/// Bearer token for the remote API. Unset means "ask gcloud".
pub fn access_token() -> Option<String> {
    std::env::var("FWT_ACCESS_TOKEN").ok().filter(|s| !s.is_empty())
}

/// SendGrid key for failure emails.
pub fn sendgrid_api_key() -> Option<String> {
    std::env::var("SENDGRID_API_KEY").ok().filter(|s| !s.is_empty())
}

/// Remote API base URL override.
pub fn api_url() -> Option<String> {
    std::env::var("FWT_API_URL").ok().filter(|s| !s.is_empty())
}

/// Resolve config file: FWT_CONFIG > XDG config dir/fwt/config.toml
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var("FWT_CONFIG").ok().filter(|s| !s.is_empty()) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("fwt").join("config.toml"))
}

/// Local scratch directory for reports before upload.
pub fn staging_dir() -> PathBuf {
    dirs::cache_dir().unwrap_or_else(std::env::temp_dir).join("fwt").join("reports")
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
