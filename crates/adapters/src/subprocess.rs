// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External command execution with a deadline.

use std::process::Output;
use std::time::Duration;
use tokio::process::Command;

/// Deadline for short cloud CLI calls (token lookup, object upload).
pub const CLI_TIMEOUT: Duration = Duration::from_secs(120);

/// Run `cmd` to completion, failing if it takes longer than `timeout`.
///
/// A non-zero exit is not an error here; callers inspect `status`.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    label: &str,
) -> Result<Output, String> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(format!("failed to run {}: {}", label, e)),
        Err(_) => Err(format!("{} timed out after {}s", label, timeout.as_secs())),
    }
}

/// Run `cmd` and return trimmed stdout, failing on a non-zero exit.
pub async fn run_checked(cmd: Command, timeout: Duration, label: &str) -> Result<String, String> {
    let output = run_with_timeout(cmd, timeout, label).await?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("{} failed: {}", label, stderr.trim()));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
#[path = "subprocess_tests.rs"]
mod tests;
