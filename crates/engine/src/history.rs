// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cost of past test runs, totalled from the clones each run left in the
//! clone project. Runs whose clones were already cleaned up are not seen.

use fwt_adapters::{ApiError, JobApi};
use fwt_core::{clone_timestamp, WorkspaceRef, CLONE_TIME_FORMAT};
use std::collections::BTreeMap;

/// Spend of one test run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunCost {
    /// Shared clone-name suffix, `YYYY-MM-DD-HH-MM-SS`
    pub clone_time: String,
    pub workspaces: usize,
    /// Submissions that reported a cost
    pub submissions: usize,
    pub total: f64,
    /// Clones or submissions whose cost could not be fetched
    pub unavailable: usize,
}

/// Clone time a workspace name was stamped with, in report-folder form.
fn run_key(ws: &WorkspaceRef) -> Option<String> {
    clone_timestamp(&ws.name).map(|at| at.format(CLONE_TIME_FORMAT).to_string())
}

async fn clone_cost<A: JobApi>(api: &A, ws: &WorkspaceRef, run: &mut RunCost) {
    let ids = match api.list_submissions(ws).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::warn!(workspace = %ws, error = %e, "could not list submissions");
            run.unavailable += 1;
            return;
        }
    };
    for id in ids {
        match api.get_submission(ws, &id).await {
            Ok(remote) => {
                if let Some(cost) = remote.cost {
                    run.total += cost;
                    run.submissions += 1;
                }
            }
            Err(e) => {
                tracing::warn!(workspace = %ws, submission = %id, error = %e, "cost unavailable");
                run.unavailable += 1;
            }
        }
    }
}

/// Total spend per test run found in `project`, oldest run first.
///
/// Workspaces not named like clones are ignored.
pub async fn run_costs<A: JobApi>(api: &A, project: &str) -> Result<Vec<RunCost>, ApiError> {
    let mut runs: BTreeMap<String, RunCost> = BTreeMap::new();
    for ws in api.list_workspaces(project).await? {
        let Some(key) = run_key(&ws) else {
            tracing::debug!(workspace = %ws, "not a clone, ignored");
            continue;
        };
        let run = runs
            .entry(key.clone())
            .or_insert_with(|| RunCost { clone_time: key, ..RunCost::default() });
        run.workspaces += 1;
        clone_cost(api, &ws, run).await;
    }
    Ok(runs.into_values().collect())
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
