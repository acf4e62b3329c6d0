// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn fwt_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn fwt_help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("run")
        .stdout_has("cleanup")
        .stdout_has("list")
        .stdout_has("report")
        .stdout_has("costs");
}

#[test]
fn fwt_run_help_shows_flags() {
    cli()
        .args(&["run", "--help"])
        .passes()
        .stdout_has("--only")
        .stdout_has("--mute-notifications")
        .stdout_has("--query-costs")
        .stdout_has("--abort-hours");
}

#[test]
fn fwt_cleanup_help_shows_age() {
    cli().args(&["cleanup", "--help"]).passes().stdout_has("--age-days");
}

#[test]
fn fwt_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}

#[test]
fn conflicting_report_destinations_are_a_usage_error() {
    cli()
        .args(&["run", "--gcs-path", "gs://bucket/", "--report-dir", "/tmp/reports"])
        .fails_with(2)
        .stderr_has("cannot be used with");
}
