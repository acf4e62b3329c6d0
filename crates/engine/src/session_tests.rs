// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fwt_adapters::{
    remote_submission, ApiCall, FailureCause, FakeJobApi, MethodConfig, WorkflowFailure,
    WorkflowMetadata,
};
use fwt_core::{FakeClock, FinalStatus};

const HOUR: Duration = Duration::from_secs(3600);

fn configs(names: &[&str]) -> Vec<MethodConfig> {
    names
        .iter()
        .map(|n| MethodConfig {
            name: n.to_string(),
            namespace: "methods".to_string(),
            root_entity_type: None,
        })
        .collect()
}

fn metadata(status: &str, cause: Option<&str>) -> WorkflowMetadata {
    WorkflowMetadata {
        status: status.to_string(),
        start: None,
        end: None,
        failures: cause
            .map(|c| WorkflowFailure { caused_by: vec![FailureCause { message: c.to_string() }] })
            .into_iter()
            .collect(),
    }
}

/// Script `workflow` to run once and then finish with `outcome`.
fn script_run(api: &FakeJobApi, workflow: &str, outcome: &str, cause: Option<&str>) {
    let wf_id = format!("wf-{}", workflow);
    api.script_submission(
        workflow,
        vec![
            remote_submission("Running", "Running", Some(&wf_id)),
            remote_submission("Done", outcome, Some(&wf_id)),
        ],
    );
    api.set_metadata(&wf_id, metadata(outcome, cause));
}

/// Script `workflow` to stay running until aborted.
fn script_long_run(api: &FakeJobApi, workflow: &str) {
    let wf_id = format!("wf-{}", workflow);
    api.script_submission(workflow, vec![remote_submission("Running", "Running", Some(&wf_id))]);
}

async fn session(api: &FakeJobApi, clock: &FakeClock, names: &[&str]) -> WorkspaceSession<FakeClock> {
    let origin = WorkspaceRef::new("help-gatk", "Intro");
    let cloned = ClonedWorkspace::new(origin, "featured-workspace-testing", clock.wall())
        .owners(vec!["owner@example.org".to_string()]);
    api.set_method_configs(&cloned.clone, configs(names));
    let mut session = WorkspaceSession::new(cloned, false, clock.clone()).abort_after(48 * HOUR);
    session.enumerate(api).await.unwrap();
    session
}

async fn drive_until_drained(api: &FakeJobApi, session: &mut WorkspaceSession<FakeClock>) {
    for _ in 0..10 {
        if session.is_drained() {
            return;
        }
        session.drive(api).await.unwrap();
    }
    panic!("session did not drain");
}

fn completed_names(session: &WorkspaceSession<FakeClock>) -> Vec<&str> {
    session.completed().map(Submission::workflow_name).collect()
}

#[tokio::test]
async fn numbered_workflows_run_one_batch_at_a_time() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_run(&api, "1-align", "Succeeded", None);
    script_run(&api, "2-call", "Succeeded", None);
    let mut session = session(&api, &clock, &["2-call", "1-align"]).await;

    session.drive(&api).await.unwrap();
    assert_eq!(api.created(), vec!["1-align"]);

    drive_until_drained(&api, &mut session).await;

    assert_eq!(api.created(), vec!["1-align", "2-call"]);
    assert_eq!(completed_names(&session), vec!["1-align", "2-call"]);
    assert_eq!(session.status(), SessionStatus::Success);
    assert_eq!(session.status().to_string(), "SUCCESS!");
}

#[tokio::test]
async fn second_batch_starts_only_after_first_is_terminal() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_long_run(&api, "1-align");
    script_run(&api, "2-call", "Succeeded", None);
    let mut session = session(&api, &clock, &["1-align", "2-call"]).await;

    for _ in 0..3 {
        session.drive(&api).await.unwrap();
    }

    assert_eq!(api.created(), vec!["1-align"]);
    assert!(!session.is_drained());
}

#[tokio::test]
async fn unnumbered_workflows_are_created_together() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_long_run(&api, "alignA");
    script_long_run(&api, "alignB");
    let mut session = session(&api, &clock, &["alignA", "alignB"]).await;

    session.drive(&api).await.unwrap();

    assert_eq!(api.created(), vec!["alignA", "alignB"]);
}

#[tokio::test]
async fn rejected_create_is_never_polled() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    api.reject_create("align", 404, "workspace not found");
    let mut session = session(&api, &clock, &["align"]).await;

    session.drive(&api).await.unwrap();
    session.drive(&api).await.unwrap();

    let sub = &session.submissions()[0];
    assert_eq!(sub.final_status(), Some(&FinalStatus::Rejected));
    assert_eq!(sub.error(), Some("workspace not found"));
    assert!(session.is_drained());
    assert!(!api
        .calls()
        .iter()
        .any(|c| matches!(c, ApiCall::GetSubmission(_) | ApiCall::GetWorkflowMetadata { .. })));
    assert_eq!(session.status().to_string(), "FAILURE!");
}

#[tokio::test]
async fn one_failure_in_parallel_batch_fails_session() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_run(&api, "alignA", "Succeeded", None);
    script_run(&api, "alignB", "Failed", Some("Task align failed."));
    script_run(&api, "alignC", "Succeeded", None);
    let mut session = session(&api, &clock, &["alignA", "alignB", "alignC"]).await;

    drive_until_drained(&api, &mut session).await;

    assert_eq!(session.status(), SessionStatus::Failure);
    let failed: Vec<_> = session
        .completed()
        .filter(|s| s.final_status() == Some(&FinalStatus::Failed))
        .map(|s| (s.workflow_name(), s.error()))
        .collect();
    assert_eq!(failed, vec![("alignB", Some("Task align failed."))]);
    assert_eq!(completed_names(&session).len(), 3);
}

#[tokio::test]
async fn pending_submissions_are_aborted_once_past_the_limit() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_long_run(&api, "align");
    let mut session = session(&api, &clock, &["align"]).await;

    session.drive(&api).await.unwrap();
    clock.advance(47 * HOUR);
    session.drive(&api).await.unwrap();
    assert!(api.aborted().is_empty());

    clock.advance(2 * HOUR);
    session.drive(&api).await.unwrap();
    assert_eq!(api.aborted(), vec![FakeJobApi::submission_id_for("align")]);

    session.drive(&api).await.unwrap();
    assert_eq!(api.aborted().len(), 1);
}

#[tokio::test]
async fn submission_created_past_the_limit_is_aborted_next_cycle() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_long_run(&api, "1-align");
    script_long_run(&api, "2-call");
    api.script_submission(
        "1-align",
        vec![
            remote_submission("Running", "Running", Some("wf-1")),
            remote_submission("Done", "Succeeded", Some("wf-1")),
        ],
    );
    api.set_metadata("wf-1", metadata("Succeeded", None));
    let mut session = session(&api, &clock, &["1-align", "2-call"]).await;

    session.drive(&api).await.unwrap();
    clock.advance(49 * HOUR);
    // 1-align finishes, 2-call is created in the same cycle
    session.drive(&api).await.unwrap();
    assert_eq!(api.created(), vec!["1-align", "2-call"]);
    assert!(api.aborted().is_empty());

    session.drive(&api).await.unwrap();
    assert_eq!(api.aborted(), vec![FakeJobApi::submission_id_for("2-call")]);
}

#[tokio::test]
async fn aborted_submission_is_still_finalized() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    api.script_submission(
        "align",
        vec![
            remote_submission("Running", "Running", Some("wf-align")),
            remote_submission("Aborting", "Running", Some("wf-align")),
            remote_submission("Aborted", "Aborted", Some("wf-align")),
        ],
    );
    api.set_metadata("wf-align", metadata("Aborted", None));
    let mut session = session(&api, &clock, &["align"]).await;

    session.drive(&api).await.unwrap();
    clock.advance(49 * HOUR);
    drive_until_drained(&api, &mut session).await;

    assert_eq!(session.submissions()[0].final_status(), Some(&FinalStatus::Aborted));
    assert_eq!(session.status(), SessionStatus::Failure);
}

#[tokio::test]
async fn drive_is_idempotent_once_drained() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_run(&api, "align", "Succeeded", None);
    let mut session = session(&api, &clock, &["align"]).await;
    drive_until_drained(&api, &mut session).await;
    let calls = api.calls().len();

    session.drive(&api).await.unwrap();
    session.drive(&api).await.unwrap();

    assert_eq!(api.calls().len(), calls);
    assert_eq!(completed_names(&session), vec!["align"]);
}

#[tokio::test]
async fn optional_workflow_counts_as_passing_without_submission() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_run(&api, "align", "Succeeded", None);
    let mut session = session(&api, &clock, &["align", "optional-qc"]).await;

    drive_until_drained(&api, &mut session).await;

    assert_eq!(api.created(), vec!["align"]);
    // Never submitted, so it completes on the first pass while align is still running
    assert_eq!(completed_names(&session), vec!["optional-qc", "align"]);
    assert_eq!(session.status(), SessionStatus::Success);
}

#[tokio::test]
async fn api_error_stops_the_session() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    script_long_run(&api, "align");
    let mut session = session(&api, &clock, &["align"]).await;
    api.fail_next(
        "get_submission",
        fwt_adapters::ApiError::Status {
            method: "GET",
            path: "submissions/sub-align".into(),
            status: 403,
            body: String::new(),
        },
    );

    let err = session.drive(&api).await.unwrap_err();

    assert!(matches!(err, SessionError::Api(fwt_adapters::ApiError::Status { status: 403, .. })));
}

#[tokio::test]
async fn elapsed_is_frozen_at_stop_and_flagged_when_long() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    let mut session = session(&api, &clock, &[]).await;

    clock.advance(3 * HOUR);
    session.stop();
    clock.advance(HOUR);

    let elapsed = session.elapsed();
    assert_eq!(elapsed.duration, 3 * HOUR);
    assert!(elapsed.flagged);
}

#[tokio::test]
async fn empty_workspace_is_drained_and_passes() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    let session = session(&api, &clock, &[]).await;

    assert!(session.is_drained());
    assert_eq!(session.status(), SessionStatus::Success);
}

#[tokio::test]
async fn costs_are_totalled_over_completed_submissions() {
    let api = FakeJobApi::new();
    let clock = FakeClock::new();
    for (name, cost) in [("alignA", 1.5), ("alignB", 0.25)] {
        let mut done = remote_submission("Done", "Succeeded", Some(&format!("wf-{}", name)));
        done.cost = Some(cost);
        api.script_submission(name, vec![done]);
        api.set_metadata(&format!("wf-{}", name), metadata("Succeeded", None));
    }
    let mut session = session(&api, &clock, &["alignA", "alignB"]).await;
    drive_until_drained(&api, &mut session).await;

    let total = session.fetch_costs(&api).await;

    assert!((total - 1.75).abs() < f64::EPSILON);
    assert_eq!(session.total_cost(), Some(total));
}
