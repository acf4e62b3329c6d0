// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn job_manager_link() {
    assert_eq!(job_manager("wf-1"), "https://job-manager.dsde-prod.broadinstitute.org/jobs/wf-1");
}

#[test]
fn job_history_escapes_spaces() {
    assert_eq!(
        job_history("help gatk", "My Workspace_2026", Some("sub-9")),
        "https://app.terra.bio/#workspaces/help%20gatk/My%20Workspace_2026/job_history/sub-9"
    );
}

#[test]
fn job_history_without_submission() {
    assert_eq!(
        job_history("proj", "ws", None),
        "https://app.terra.bio/#workspaces/proj/ws/job_history/"
    );
}

#[test]
fn public_url_rewrites_bucket_paths_only() {
    assert_eq!(
        public_url("gs://reports/fw_reports/a.html"),
        "https://storage.googleapis.com/reports/fw_reports/a.html"
    );
    assert_eq!(public_url("/tmp/a.html"), "/tmp/a.html");
}
