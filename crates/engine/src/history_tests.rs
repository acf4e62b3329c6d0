// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fwt_adapters::{remote_submission, FakeJobApi};

const PROJECT: &str = "featured-workspace-testing";

fn clone(name: &str) -> WorkspaceRef {
    WorkspaceRef::new(PROJECT, name)
}

fn script_cost(api: &FakeJobApi, workflow: &str, cost: Option<f64>) {
    let mut remote = remote_submission("Done", "Succeeded", None);
    remote.cost = cost;
    api.script_submission(workflow, vec![remote]);
}

#[tokio::test]
async fn costs_are_totalled_per_run_oldest_first() {
    let api = FakeJobApi::new();
    let late_a = clone("A_2026-03-14-09-26-53");
    let late_b = clone("B_2026-03-14-09-26-53");
    let early = clone("A_2026-03-07-09-00-00");
    api.set_existing(vec![late_a.clone(), clone("scratch"), late_b.clone(), early.clone()]);
    api.set_history(&late_a, &["a-align", "a-call"]);
    api.set_history(&late_b, &["b-align"]);
    api.set_history(&early, &["early-align"]);
    script_cost(&api, "a-align", Some(1.25));
    script_cost(&api, "a-call", None);
    script_cost(&api, "b-align", Some(0.5));
    script_cost(&api, "early-align", Some(3.0));

    let runs = run_costs(&api, PROJECT).await.unwrap();

    assert_eq!(
        runs,
        vec![
            RunCost {
                clone_time: "2026-03-07-09-00-00".into(),
                workspaces: 1,
                submissions: 1,
                total: 3.0,
                unavailable: 0,
            },
            RunCost {
                clone_time: "2026-03-14-09-26-53".into(),
                workspaces: 2,
                submissions: 2,
                total: 1.75,
                unavailable: 0,
            },
        ]
    );
}

#[tokio::test]
async fn unreadable_clone_is_counted_and_skipped() {
    let api = FakeJobApi::new();
    let first = clone("A_2026-03-14-09-26-53");
    let second = clone("B_2026-03-14-09-26-53");
    api.set_existing(vec![first.clone(), second.clone()]);
    api.set_history(&first, &["a-align"]);
    api.set_history(&second, &["b-align", "b-missing"]);
    script_cost(&api, "a-align", Some(2.0));
    script_cost(&api, "b-align", Some(1.0));
    api.fail_next(
        "list_submissions",
        ApiError::Status { method: "GET", path: "x".into(), status: 403, body: String::new() },
    );

    let runs = run_costs(&api, PROJECT).await.unwrap();

    // First clone's listing fails; second clone's "b-missing" was never scripted
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].workspaces, 2);
    assert_eq!(runs[0].submissions, 1);
    assert_eq!(runs[0].total, 1.0);
    assert_eq!(runs[0].unavailable, 2);
}

#[tokio::test]
async fn listing_failure_is_an_error() {
    let api = FakeJobApi::new();
    api.fail_next("list_workspaces", ApiError::Transport("reset".into()));

    let err = run_costs(&api, PROJECT).await.unwrap_err();

    assert_eq!(err, ApiError::Transport("reset".into()));
}

#[tokio::test]
async fn project_without_clones_has_no_runs() {
    let api = FakeJobApi::new();
    api.set_existing(vec![clone("notes"), WorkspaceRef::new("elsewhere", "A_2026-03-14-09-26-53")]);

    assert!(run_costs(&api, PROJECT).await.unwrap().is_empty());
}
