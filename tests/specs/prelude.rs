// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for CLI specs.

use assert_cmd::Command;
use std::path::Path;

/// `fwt` with a clean environment: no color, no ambient config or credentials.
pub fn cli() -> Cli {
    let mut cmd = Command::cargo_bin("fwt").expect("fwt binary is built");
    cmd.env("NO_COLOR", "1")
        .env_remove("COLOR")
        .env_remove("RUST_LOG")
        .env_remove("FWT_ACCESS_TOKEN")
        .env_remove("SENDGRID_API_KEY")
        .env_remove("FWT_API_URL")
        .env("FWT_CONFIG", "/nonexistent/fwt/config.toml");
    Cli { cmd }
}

pub struct Cli {
    cmd: Command,
}

impl Cli {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn config_file(mut self, path: &Path) -> Self {
        self.cmd.arg("--config").arg(path);
        self
    }

    pub fn passes(mut self) -> Output {
        let out = self.cmd.output().expect("fwt runs");
        assert!(out.status.success(), "expected success, got {:?}\n{}", out.status, stderr(&out));
        Output { out }
    }

    pub fn fails_with(mut self, code: i32) -> Output {
        let out = self.cmd.output().expect("fwt runs");
        assert_eq!(out.status.code(), Some(code), "stderr:\n{}", stderr(&out));
        Output { out }
    }
}

pub struct Output {
    out: std::process::Output,
}

impl Output {
    pub fn stdout_has(self, text: &str) -> Self {
        let stdout = String::from_utf8_lossy(&self.out.stdout).into_owned();
        assert!(stdout.contains(text), "stdout missing {text:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, text: &str) -> Self {
        let err = stderr(&self.out);
        assert!(err.contains(text), "stderr missing {text:?}:\n{err}");
        self
    }
}

fn stderr(out: &std::process::Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}
