// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deep links into the platform UI.

const JOB_MANAGER: &str = "https://job-manager.dsde-prod.broadinstitute.org/jobs/";
const TERRA_WORKSPACES: &str = "https://app.terra.bio/#workspaces/";
const GCS_PUBLIC: &str = "https://storage.googleapis.com/";

fn escape(segment: &str) -> String {
    segment.replace(' ', "%20")
}

/// Job-detail viewer for a running or finished workflow.
pub fn job_manager(workflow_id: &str) -> String {
    format!("{}{}", JOB_MANAGER, workflow_id)
}

/// Workspace job-history view, optionally scoped to one submission.
pub fn job_history(project: &str, workspace: &str, submission_id: Option<&str>) -> String {
    format!(
        "{}{}/{}/job_history/{}",
        TERRA_WORKSPACES,
        escape(project),
        escape(workspace),
        submission_id.unwrap_or_default()
    )
}

/// Public HTTPS URL for an object under a `gs://` path.
///
/// Paths that are not bucket paths are returned unchanged.
pub fn public_url(path: &str) -> String {
    match path.strip_prefix("gs://") {
        Some(rest) => format!("{}{}", GCS_PUBLIC, rest),
        None => path.to_string(),
    }
}

#[cfg(test)]
#[path = "links_tests.rs"]
mod tests;
