// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Removing clones left behind by earlier runs.

use chrono::{DateTime, Utc};
use fwt_adapters::{ApiError, JobApi};
use fwt_core::{clone_timestamp, WorkspaceRef};

/// Clones older than this many whole days are deleted by default.
pub const DEFAULT_MAX_AGE_DAYS: i64 = 20;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    pub deleted: Vec<WorkspaceRef>,
    /// Workspaces too recent to delete, or not named like a clone
    pub kept: usize,
    pub failed: Vec<(WorkspaceRef, String)>,
}

/// Age of a clone in whole days, or `None` if `name` carries no clone timestamp.
pub fn clone_age_days(name: &str, now: DateTime<Utc>) -> Option<i64> {
    let cloned_at = clone_timestamp(name)?;
    Some((now.naive_utc() - cloned_at).num_days())
}

/// Delete workspaces in `project` whose clone timestamp is more than
/// `max_age_days` whole days before `now`.
///
/// A failed delete is recorded and does not stop the sweep.
pub async fn cleanup_clones<A: JobApi>(
    api: &A,
    project: &str,
    max_age_days: i64,
    now: DateTime<Utc>,
) -> Result<CleanupReport, ApiError> {
    let mut report = CleanupReport::default();
    for ws in api.list_workspaces(project).await? {
        let age = clone_age_days(&ws.name, now);
        tracing::debug!(workspace = %ws, age_days = ?age, "clone age");
        if !age.is_some_and(|days| days > max_age_days) {
            report.kept += 1;
            continue;
        }
        match api.delete_workspace(&ws).await {
            Ok(()) => {
                tracing::info!(workspace = %ws, "deleted old clone");
                report.deleted.push(ws);
            }
            Err(e) => {
                tracing::warn!(workspace = %ws, error = %e, "failed to delete old clone");
                report.failed.push((ws, e.to_string()));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
#[path = "cleanup_tests.rs"]
mod tests;
