// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Optional TOML config file. Every key falls back to the built-in default;
//! command-line flags are applied on top by each command.

use fwt_adapters::DEFAULT_API_URL;
use fwt_engine::RunConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REPORT_ROOT: &str = "gs://terra-featured-workspace-tests-reports/fw_reports/";
pub const DEFAULT_SENDER: &str = "terra-support-sendgrid@broadinstitute.org";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },
}

/// Where rendered reports go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishTarget {
    /// `gs://` prefix, uploaded with gsutil
    Bucket(String),
    Directory(PathBuf),
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub clone_project: Option<String>,
    /// Group the clones are shared with; empty string disables sharing
    pub share_with: Option<String>,
    pub bucket_location: Option<String>,
    pub clone_concurrency: Option<usize>,
    pub skip: Option<Vec<String>>,
    pub do_not_notify: Option<Vec<String>>,
    pub poll_interval_secs: Option<u64>,
    /// 0 disables aborting
    pub abort_after_hours: Option<u64>,
    pub cleanup_age_days: Option<i64>,
    pub call_cache: Option<bool>,
    pub report_root: Option<String>,
    /// Write reports here instead of uploading them
    pub report_dir: Option<PathBuf>,
    pub sender: Option<String>,
}

impl FileConfig {
    /// Load `explicit`, or the default location if it exists.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match crate::env::config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let config = Self::parse(&text).map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Run settings with file values over the defaults
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::default();
        if let Some(project) = &self.clone_project {
            config.clone.clone_project = project.clone();
        }
        if let Some(group) = &self.share_with {
            config.clone.share_with = Some(group.clone()).filter(|g| !g.is_empty());
        }
        if let Some(location) = &self.bucket_location {
            config.clone.bucket_location = Some(location.clone());
        }
        if let Some(n) = self.clone_concurrency {
            config.clone.concurrency = n.max(1);
        }
        if let Some(skip) = &self.skip {
            config.clone.skip = skip.clone();
        }
        if let Some(keys) = &self.do_not_notify {
            config.do_not_notify = keys.clone();
        }
        if let Some(secs) = self.poll_interval_secs {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(hours) = self.abort_after_hours {
            config.abort_after = abort_after(hours);
        }
        if let Some(days) = self.cleanup_age_days {
            config.cleanup_age_days = days;
        }
        if let Some(cache) = self.call_cache {
            config.call_cache = cache;
        }
        config
    }

    /// FWT_API_URL > file > built-in
    pub fn api_url(&self) -> String {
        crate::env::api_url()
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn publish_target(&self) -> PublishTarget {
        match &self.report_dir {
            Some(dir) => PublishTarget::Directory(dir.clone()),
            None => PublishTarget::Bucket(
                self.report_root.clone().unwrap_or_else(|| DEFAULT_REPORT_ROOT.to_string()),
            ),
        }
    }

    pub fn sender(&self) -> &str {
        self.sender.as_deref().unwrap_or(DEFAULT_SENDER)
    }
}

/// Hours to an abort ceiling; zero means never abort.
pub fn abort_after(hours: u64) -> Option<Duration> {
    (hours > 0).then(|| Duration::from_secs(hours * 60 * 60))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
