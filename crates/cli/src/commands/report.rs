// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fwt report` — regenerate a run's master report from its published
//! workspace reports.

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;
use fwt_adapters::{DirectoryPublisher, GsutilPublisher, ReportPublisher};
use fwt_core::CLONE_TIME_FORMAT;
use fwt_engine::{rebuild_master, RebuiltMaster};

use super::ReportLocation;
use crate::color;
use crate::config::{FileConfig, PublishTarget};

#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    /// Clone time of the run, e.g. 2026-03-14-09-26-53
    #[arg(long = "from", value_name = "CLONE_TIME", value_parser = parse_clone_time)]
    pub clone_time: String,

    #[command(flatten)]
    pub reports: ReportLocation,
}

fn parse_clone_time(value: &str) -> Result<String, String> {
    let value = value.trim_matches('/');
    NaiveDateTime::parse_from_str(value, CLONE_TIME_FORMAT)
        .map(|_| value.to_string())
        .map_err(|_| format!("expected YYYY-MM-DD-HH-MM-SS, got {value:?}"))
}

pub async fn handle(args: ReportArgs, file: FileConfig) -> Result<()> {
    let rebuilt = match args.reports.publish_target(&file) {
        PublishTarget::Bucket(root) => {
            let publisher = GsutilPublisher::new(root, crate::env::staging_dir());
            rebuild(&publisher, &args.clone_time).await?
        }
        PublishTarget::Directory(dir) => {
            rebuild(&DirectoryPublisher::new(dir), &args.clone_time).await?
        }
    };
    print!("{}", format_rebuilt(&rebuilt));
    Ok(())
}

async fn rebuild<P: ReportPublisher>(publisher: &P, clone_time: &str) -> Result<RebuiltMaster> {
    Ok(rebuild_master(publisher, clone_time, chrono::Utc::now()).await?)
}

pub fn format_rebuilt(rebuilt: &RebuiltMaster) -> String {
    let failed = rebuilt.rows.iter().filter(|r| r.is_failure()).count();
    let mut out = format!("{} {}\n", color::header("Master report:"), color::literal(&rebuilt.url));
    out.push_str(&format!(
        "{} failed, out of {} tested\n",
        color::outcome(&failed.to_string(), failed > 0),
        rebuilt.rows.len()
    ));
    for path in &rebuilt.skipped {
        out.push_str(&color::context(&format!("skipped {}\n", path)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fwt_core::{SessionStatus, WorkspaceRef};
    use fwt_engine::{SessionOutcome, SessionSummary};
    use serial_test::serial;

    #[yare::parameterized(
        plain          = { "2026-03-14-09-26-53", Some("2026-03-14-09-26-53") },
        folder_slashes = { "2026-03-14-09-26-53/", Some("2026-03-14-09-26-53") },
        date_only      = { "2026-03-14", None },
        garbage        = { "latest", None },
    )]
    fn clone_time_argument(value: &str, expected: Option<&str>) {
        assert_eq!(parse_clone_time(value).ok().as_deref(), expected);
    }

    #[test]
    #[serial]
    fn rebuilt_summary_counts_failures() {
        std::env::set_var("NO_COLOR", "1");
        let row = |name: &str, status| SessionSummary {
            origin: WorkspaceRef::new("p", name),
            outcome: SessionOutcome::Tested {
                status,
                workflows: 1,
                failed_html: String::new(),
                report_url: None,
                runtime_html: String::new(),
                cost: None,
            },
        };
        let rebuilt = RebuiltMaster {
            url: "https://reports.test/master_report_t.html".into(),
            rows: vec![row("A", SessionStatus::Failure), row("B", SessionStatus::Success)],
            skipped: vec!["t/notes.txt".into()],
        };

        assert_eq!(
            format_rebuilt(&rebuilt),
            "Master report: https://reports.test/master_report_t.html\n\
             1 failed, out of 2 tested\n\
             skipped t/notes.txt\n"
        );
        std::env::remove_var("NO_COLOR");
    }
}
