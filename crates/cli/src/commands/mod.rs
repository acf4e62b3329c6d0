// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod cleanup;
pub mod costs;
pub mod list;
pub mod report;
pub mod run;

use crate::config::{FileConfig, PublishTarget};
use anyhow::{Context, Result};
use clap::Args;
use fwt_adapters::{HttpJobApi, RetryPolicy, Retrying, TokenCache};
use std::path::PathBuf;

/// Where reports are published, overriding the config file
#[derive(Args, Debug, Default, Clone)]
pub struct ReportLocation {
    /// gs:// prefix reports are uploaded under
    #[arg(long, value_name = "GS_PATH", conflicts_with = "report_dir")]
    pub gcs_path: Option<String>,

    /// Write reports to this directory instead of uploading them
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<PathBuf>,
}

impl ReportLocation {
    pub fn publish_target(&self, file: &FileConfig) -> PublishTarget {
        if let Some(dir) = &self.report_dir {
            return PublishTarget::Directory(dir.clone());
        }
        if let Some(root) = &self.gcs_path {
            return PublishTarget::Bucket(root.clone());
        }
        file.publish_target()
    }
}

/// Authenticated API client with transient-failure retries.
///
/// The first token is fetched here so a missing login fails before any work.
pub async fn connect(file: &FileConfig) -> Result<Retrying<HttpJobApi>> {
    let tokens = TokenCache::from_explicit(crate::env::access_token());
    tokens.token().await?;
    let url = file.api_url();
    tracing::debug!(%url, "using remote API");
    let api = HttpJobApi::new(url, tokens).context("failed to build API client")?;
    Ok(Retrying::new(api, RetryPolicy::default()))
}
