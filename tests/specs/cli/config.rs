// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Config file handling, checked before any remote call.

use crate::prelude::*;
use std::io::Write;

#[test]
fn missing_explicit_config_fails() {
    let dir = tempfile::tempdir().unwrap();
    cli()
        .config_file(&dir.path().join("absent.toml"))
        .args(&["list"])
        .fails_with(2)
        .stderr_has("could not read");
}

#[test]
fn malformed_config_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "poll_interval_secs = \"soon\"").unwrap();

    cli().config_file(file.path()).args(&["list"]).fails_with(2).stderr_has("invalid config");
}

#[test]
fn unknown_config_key_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "clone_projekt = \"typo\"").unwrap();

    cli().config_file(file.path()).args(&["cleanup"]).fails_with(2).stderr_has("unknown field");
}
