// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::api::FakeJobApi;
use tokio::time::Instant;

fn server_error() -> ApiError {
    ApiError::Status { method: "GET", path: "workspaces".into(), status: 503, body: String::new() }
}

fn forbidden() -> ApiError {
    ApiError::Status { method: "GET", path: "workspaces".into(), status: 403, body: String::new() }
}

#[yare::parameterized(
    first   = { 1, 1 },
    second  = { 2, 5 },
    third   = { 3, 10 },
    fourth  = { 4, 30 },
    fifth   = { 5, 60 },
    beyond  = { 9, 60 },
)]
fn default_delay_schedule(failed: usize, secs: u64) {
    assert_eq!(RetryPolicy::default().delay(failed), Duration::from_secs(secs));
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_with_schedule() {
    let api = FakeJobApi::new();
    api.fail_next("list_workspaces", server_error());
    api.fail_next("list_workspaces", ApiError::Transport("reset".into()));
    let retrying = Retrying::new(api.clone(), RetryPolicy::default());

    let start = Instant::now();
    let listed = retrying.list_workspaces("fw-testing").await.unwrap();

    assert!(listed.is_empty());
    assert_eq!(api.calls().len(), 3);
    assert_eq!(start.elapsed(), Duration::from_secs(1 + 5));
}

#[tokio::test(start_paused = true)]
async fn exhaustion_surfaces_last_error() {
    let api = FakeJobApi::new();
    for _ in 0..5 {
        api.fail_next("get_workspace", server_error());
    }
    let retrying = Retrying::new(api.clone(), RetryPolicy::default());

    let start = Instant::now();
    let err = retrying.get_workspace(&WorkspaceRef::new("p", "w")).await.unwrap_err();

    assert_eq!(err, ApiError::Exhausted { attempts: 5, last: Box::new(server_error()) });
    assert_eq!(api.calls().len(), 5);
    assert_eq!(start.elapsed(), Duration::from_secs(1 + 5 + 10 + 30));
}

#[tokio::test(start_paused = true)]
async fn unexpected_client_error_is_not_retried() {
    let api = FakeJobApi::new();
    api.fail_next("list_method_configs", forbidden());
    let retrying = Retrying::new(api.clone(), RetryPolicy::default());

    let err = retrying.list_method_configs(&WorkspaceRef::new("p", "w")).await.unwrap_err();

    assert_eq!(err, forbidden());
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn rejection_passes_through_as_data() {
    let api = FakeJobApi::new();
    api.reject_create("1-align", 404, "workspace not found");
    let retrying = Retrying::new(api.clone(), RetryPolicy::default());
    let target = fwt_core::test_support::target("1-align");

    let outcome = retrying
        .create_submission(&WorkspaceRef::new("p", "w"), &CreateSubmission::new(&target, false))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        CreateOutcome::Rejected { status: 404, message: "workspace not found".into() }
    );
    assert_eq!(api.created(), vec!["1-align".to_string()]);
}

#[tokio::test]
async fn single_attempt_policy_returns_raw_error() {
    let api = FakeJobApi::new();
    api.fail_next("delete_workspace", server_error());
    let retrying = Retrying::new(api.clone(), RetryPolicy::none());

    let err = retrying.delete_workspace(&WorkspaceRef::new("p", "w")).await.unwrap_err();

    assert_eq!(err, server_error());
}
