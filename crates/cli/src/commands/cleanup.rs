// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fwt cleanup` — delete clones left behind by earlier runs.

use anyhow::Result;
use clap::Args;
use fwt_engine::{cleanup_clones, CleanupReport};

use crate::color;
use crate::config::FileConfig;
use crate::exit_error::{ExitError, CLEANUP_INCOMPLETE};

#[derive(Args, Debug, Default)]
pub struct CleanupArgs {
    /// Delete clones older than this many days
    #[arg(long, value_name = "DAYS")]
    pub age_days: Option<i64>,

    /// Billing project to sweep
    #[arg(long)]
    pub clone_project: Option<String>,
}

pub async fn handle(args: CleanupArgs, file: FileConfig) -> Result<()> {
    let config = file.run_config();
    let project = args.clone_project.unwrap_or(config.clone.clone_project);
    let days = args.age_days.unwrap_or(config.cleanup_age_days);
    let api = super::connect(&file).await?;

    let report = cleanup_clones(&api, &project, days, chrono::Utc::now()).await?;

    print!("{}", format_report(&report));
    if !report.failed.is_empty() {
        return Err(ExitError::new(
            CLEANUP_INCOMPLETE,
            format!("{} clone(s) could not be deleted", report.failed.len()),
        )
        .into());
    }
    Ok(())
}

pub fn format_report(report: &CleanupReport) -> String {
    let mut out = String::new();
    for ws in &report.deleted {
        out.push_str(&format!("Deleted {}\n", color::literal(&ws.to_string())));
    }
    for (ws, error) in &report.failed {
        out.push_str(&format!(
            "{} {} {}\n",
            color::outcome("Failed", true),
            color::literal(&ws.to_string()),
            color::context(error)
        ));
    }
    out.push_str(&format!(
        "\n{} deleted, {} kept, {} failed\n",
        report.deleted.len(),
        report.kept,
        report.failed.len()
    ));
    out
}
