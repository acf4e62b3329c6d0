// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovering the featured workspaces and cloning them for a test run.

use chrono::{DateTime, Utc};
use fwt_adapters::{ApiError, CloneOptions, JobApi};
use fwt_core::{ClonedWorkspace, WorkspaceRef};
use futures_util::stream::{self, StreamExt};

/// Clones made concurrently by default.
pub const DEFAULT_CLONE_CONCURRENCY: usize = 4;

/// Which workspaces to test and where to put the clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneSettings {
    /// Billing project the clones are created in
    pub clone_project: String,
    /// Group given read access to every clone
    pub share_with: Option<String>,
    /// `project/name` keys never tested
    pub skip: Vec<String>,
    /// Only test workspaces whose key contains this text
    pub only: Option<String>,
    pub bucket_location: Option<String>,
    pub concurrency: usize,
}

impl CloneSettings {
    pub fn new(clone_project: impl Into<String>) -> Self {
        Self {
            clone_project: clone_project.into(),
            share_with: None,
            skip: Vec::new(),
            only: None,
            bucket_location: None,
            concurrency: DEFAULT_CLONE_CONCURRENCY,
        }
    }

    fn selects(&self, ws: &WorkspaceRef) -> bool {
        let key = ws.key();
        if self.skip.iter().any(|s| *s == key) {
            tracing::info!(workspace = %ws, "skipping: on skip list");
            return false;
        }
        match &self.only {
            Some(filter) => key.contains(filter.as_str()),
            None => true,
        }
    }
}

/// A featured workspace selected for testing, with the owners to notify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeaturedWorkspace {
    pub workspace: WorkspaceRef,
    pub owners: Vec<String>,
}

/// Fetch the featured list and keep the workspaces this run should test.
///
/// Azure workspaces are skipped, as are workspaces whose details cannot be read.
pub async fn discover_featured<A: JobApi>(
    api: &A,
    settings: &CloneSettings,
) -> Result<Vec<FeaturedWorkspace>, ApiError> {
    let featured = api.featured_workspaces().await?;
    let mut selected = Vec::new();
    for ws in featured.into_iter().filter(|ws| settings.selects(ws)) {
        let details = match api.get_workspace(&ws).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(workspace = %ws, error = %e, "skipping: workspace details unavailable");
                continue;
            }
        };
        if details.is_azure() {
            tracing::info!(workspace = %ws, "skipping: Azure workspace");
            continue;
        }
        selected.push(FeaturedWorkspace { workspace: ws, owners: details.owners });
    }
    tracing::info!(count = selected.len(), "featured workspaces selected");
    Ok(selected)
}

async fn clone_one<A: JobApi>(
    api: &A,
    featured: FeaturedWorkspace,
    settings: &CloneSettings,
    cloned_at: DateTime<Utc>,
) -> Result<ClonedWorkspace, ApiError> {
    let cloned = ClonedWorkspace::new(featured.workspace, &settings.clone_project, cloned_at)
        .owners(featured.owners);
    let options = CloneOptions { bucket_location: settings.bucket_location.clone() };
    api.clone_workspace(&cloned.origin, &cloned.clone, &options).await?;
    if let Some(group) = &settings.share_with {
        api.share_workspace(&cloned.clone, std::slice::from_ref(group)).await?;
    }
    tracing::info!(origin = %cloned.origin, clone = %cloned.clone, "workspace cloned");
    Ok(cloned)
}

/// Clone every selected workspace, a bounded number at a time.
///
/// A workspace that fails to clone is logged and left out; the rest are
/// returned sorted by origin.
pub async fn clone_featured<A: JobApi>(
    api: &A,
    featured: Vec<FeaturedWorkspace>,
    settings: &CloneSettings,
    cloned_at: DateTime<Utc>,
) -> Vec<ClonedWorkspace> {
    let mut cloned: Vec<ClonedWorkspace> = stream::iter(featured)
        .map(|fw| {
            let origin = fw.workspace.clone();
            async move {
                clone_one(api, fw, settings, cloned_at).await.map_err(|e| (origin, e))
            }
        })
        .buffer_unordered(settings.concurrency.max(1))
        .filter_map(|result| async move {
            match result {
                Ok(cloned) => Some(cloned),
                Err((origin, e)) => {
                    tracing::error!(workspace = %origin, error = %e, "clone failed; workspace not tested");
                    None
                }
            }
        })
        .collect()
        .await;
    cloned.sort_by(|a, b| a.origin.cmp(&b.origin));
    cloned
}

#[cfg(test)]
#[path = "clone_tests.rs"]
mod tests;
