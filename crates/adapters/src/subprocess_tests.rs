// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn checked_returns_trimmed_stdout() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo '  token-123  '"]);
    assert_eq!(run_checked(cmd, CLI_TIMEOUT, "echo").await.unwrap(), "token-123");
}

#[tokio::test]
async fn checked_reports_stderr_on_failure() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "echo nope >&2; exit 3"]);
    let err = run_checked(cmd, CLI_TIMEOUT, "check").await.unwrap_err();
    assert_eq!(err, "check failed: nope");
}

#[tokio::test]
async fn missing_binary_is_an_error() {
    let cmd = Command::new("fwt-definitely-not-installed");
    let err = run_with_timeout(cmd, CLI_TIMEOUT, "missing").await.unwrap_err();
    assert!(err.starts_with("failed to run missing"), "got {err}");
}

#[tokio::test]
async fn slow_command_times_out() {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", "sleep 5"]);
    let err = run_with_timeout(cmd, Duration::from_millis(50), "sleep").await.unwrap_err();
    assert_eq!(err, "sleep timed out after 0s");
}
