// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error carrying a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! so `main()` decides how the process ends.

use std::fmt;

/// Exit code when `--fail-on-failure` is set and a workspace failed
pub const TESTS_FAILED: i32 = 1;
/// Exit code when some old clones could not be deleted
pub const CLEANUP_INCOMPLETE: i32 = 3;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    pub fn tests_failed(failed: usize, tested: usize) -> Self {
        Self::new(TESTS_FAILED, format!("{failed} of {tested} featured workspaces failed"))
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

/// Exit code for an error returned from a command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ExitError>().map_or(2, |e| e.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_error_keeps_its_code() {
        let err = anyhow::Error::new(ExitError::tests_failed(2, 9));
        assert_eq!(exit_code(&err), TESTS_FAILED);
        assert_eq!(err.to_string(), "2 of 9 featured workspaces failed");
    }

    #[test]
    fn other_errors_exit_two() {
        assert_eq!(exit_code(&anyhow::anyhow!("boom")), 2);
    }
}
