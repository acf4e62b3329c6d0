// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fwt costs` — what each past test run cost.

use anyhow::Result;
use clap::Args;
use fwt_engine::report::format_cost;
use fwt_engine::{run_costs, RunCost};

use crate::color;
use crate::config::FileConfig;

#[derive(Args, Debug, Default)]
pub struct CostsArgs {
    /// Billing project holding the clones
    #[arg(long)]
    pub clone_project: Option<String>,
}

pub async fn handle(args: CostsArgs, file: FileConfig) -> Result<()> {
    let project = args.clone_project.unwrap_or(file.run_config().clone.clone_project);
    let api = super::connect(&file).await?;

    let runs = run_costs(&api, &project).await?;

    print!("{}", format_costs(&runs));
    Ok(())
}

pub fn format_costs(runs: &[RunCost]) -> String {
    if runs.is_empty() {
        return "No test runs found\n".to_string();
    }
    let heading = format!("{:<21} {:>10} {:>10}", "CLONE TIME", "WORKSPACES", "COST");
    let mut out = format!("{}\n", color::header(&heading));
    for run in runs {
        out.push_str(&format!(
            "{} {:>10} {:>10}",
            color::literal(&format!("{:<21}", run.clone_time)),
            run.workspaces,
            format_cost(run.total)
        ));
        if run.unavailable > 0 {
            out.push_str(&color::context(&format!("  ({} unavailable)", run.unavailable)));
        }
        out.push('\n');
    }
    let total: f64 = runs.iter().map(|r| r.total).sum();
    out.push_str(&format!("{:<21} {:>10} {:>10}\n", "total", "", format_cost(total)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn costs_table_totals_runs() {
        std::env::set_var("NO_COLOR", "1");
        let runs = vec![
            RunCost {
                clone_time: "2026-03-07-09-00-00".into(),
                workspaces: 12,
                submissions: 20,
                total: 41.5,
                unavailable: 0,
            },
            RunCost {
                clone_time: "2026-03-14-09-26-53".into(),
                workspaces: 11,
                submissions: 18,
                total: 3.25,
                unavailable: 2,
            },
        ];

        let text = format_costs(&runs);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "CLONE TIME            WORKSPACES       COST");
        assert_eq!(lines[1], "2026-03-07-09-00-00           12     $41.50");
        assert_eq!(lines[2], "2026-03-14-09-26-53           11      $3.25  (2 unavailable)");
        assert_eq!(lines[3], "total                                $44.75");
        std::env::remove_var("NO_COLOR");
    }

    #[test]
    fn no_runs() {
        assert_eq!(format_costs(&[]), "No test runs found\n");
    }
}
