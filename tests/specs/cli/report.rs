// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fwt report` against a local report folder; no remote calls involved.

use crate::prelude::*;

const CLONE_TIME: &str = "2026-03-14-09-26-53";

fn workspace_report(name: &str, banner: &str) -> String {
    format!(
        "<html>\n<body>\n\
         <center><h1><font color=red>{banner}</font></h1></center><br><br>\n\
         <big><b>Featured Workspace: </b>{name}</big><br>\n\
         <big><b>Billing Project: </b>help-gatk</big><br><br>\n\
         Test runtime: 4m 10s\n\
         <br>Call Caching OFF (disabled)\n\
         <h3>align</h3><blockquote>Workflow Id: wf-1\n<br>Status: <font color=red>Failed</font>\n</blockquote>\n\
         </body>\n</html>\n"
    )
}

#[test]
fn report_rebuilds_master_from_folder() {
    let dir = tempfile::tempdir().unwrap();
    let folder = dir.path().join(CLONE_TIME);
    std::fs::create_dir_all(&folder).unwrap();
    std::fs::write(
        folder.join(format!("Intro_{CLONE_TIME}.html")),
        workspace_report("Intro", "FAILURE!"),
    )
    .unwrap();

    cli()
        .args(&["report", "--from", CLONE_TIME, "--report-dir"])
        .args(&[dir.path().to_str().unwrap()])
        .passes()
        .stdout_has("Master report:")
        .stdout_has("1 failed, out of 1 tested");

    let master =
        std::fs::read_to_string(dir.path().join(format!("master_report_{CLONE_TIME}.html"))).unwrap();
    assert!(master.contains("<big>Intro</big>"));
    assert!(master.contains("<font color=red>Failed</font>: align<br>"));
}

#[test]
fn report_for_missing_run_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .args(&["report", "--from", CLONE_TIME, "--report-dir"])
        .args(&[dir.path().to_str().unwrap()])
        .fails_with(2)
        .stderr_has(CLONE_TIME);
}

#[test]
fn report_rejects_malformed_clone_time() {
    cli()
        .args(&["report", "--from", "yesterday", "--report-dir", "/tmp"])
        .fails_with(2)
        .stderr_has("expected YYYY-MM-DD-HH-MM-SS");
}
