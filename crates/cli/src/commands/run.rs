// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `fwt run` — clone every featured workspace, run its workflows and report.

use anyhow::Result;
use clap::Args;
use fwt_adapters::{
    DirectoryPublisher, GsutilPublisher, JobApi, NotifyAdapter, ReportPublisher, SendGridNotifier,
};
use fwt_core::SystemClock;
use fwt_engine::{RunConfig, RunDeps, RunSummary, Runner, SessionOutcome, SessionSummary};
use std::time::Duration;

use super::ReportLocation;
use crate::color;
use crate::config::{abort_after, FileConfig, PublishTarget};
use crate::exit_error::ExitError;

#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Only test featured workspaces whose `project/name` contains this text
    #[arg(long)]
    pub only: Option<String>,

    /// Never email workspace owners
    #[arg(long)]
    pub mute_notifications: bool,

    /// Total submission costs into the reports
    #[arg(long)]
    pub query_costs: bool,

    /// Keep old clones instead of deleting them first
    #[arg(long)]
    pub skip_cleanup: bool,

    /// Exit non-zero when any workspace fails
    #[arg(long)]
    pub fail_on_failure: bool,

    /// Submit with call caching enabled
    #[arg(long)]
    pub call_cache: bool,

    /// Seconds between polling cycles
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Abort submissions still running after this many hours (0 = never)
    #[arg(long, value_name = "HOURS")]
    pub abort_hours: Option<u64>,

    /// Billing project the clones are created in
    #[arg(long)]
    pub clone_project: Option<String>,

    #[command(flatten)]
    pub reports: ReportLocation,
}

impl RunArgs {
    /// Apply flags on top of file and built-in settings.
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(only) = &self.only {
            config.clone.only = Some(only.clone());
        }
        if let Some(project) = &self.clone_project {
            config.clone.clone_project = project.clone();
        }
        if let Some(secs) = self.poll_interval {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(hours) = self.abort_hours {
            config.abort_after = abort_after(hours);
        }
        config.call_cache |= self.call_cache;
        config.query_costs |= self.query_costs;
        config.notify &= !self.mute_notifications;
        config.cleanup &= !self.skip_cleanup;
    }

}

pub async fn handle(args: RunArgs, file: FileConfig) -> Result<()> {
    let mut config = file.run_config();
    args.apply(&mut config);

    let key = crate::env::sendgrid_api_key();
    if config.notify && key.is_none() {
        tracing::warn!("SENDGRID_API_KEY is not set; owners will not be emailed");
        config.notify = false;
    }
    let notifier = SendGridNotifier::new(key.unwrap_or_default(), file.sender())?;
    let api = super::connect(&file).await?;

    let summary = match args.reports.publish_target(&file) {
        PublishTarget::Bucket(root) => {
            let publisher = GsutilPublisher::new(root, crate::env::staging_dir());
            execute(config, api, notifier, publisher).await?
        }
        PublishTarget::Directory(dir) => {
            execute(config, api, notifier, DirectoryPublisher::new(dir)).await?
        }
    };

    print!("{}", format_summary(&summary));
    let failed = summary.failed_count();
    if args.fail_on_failure && failed > 0 {
        return Err(ExitError::tests_failed(failed, summary.sessions.len()).into());
    }
    Ok(())
}

async fn execute<A, N, P>(config: RunConfig, api: A, notifier: N, publisher: P) -> Result<RunSummary>
where
    A: JobApi,
    N: NotifyAdapter,
    P: ReportPublisher,
{
    let runner = Runner::new(config, RunDeps { api, notifier, publisher, clock: SystemClock });
    Ok(runner.run().await?)
}

/// Terminal summary: master report link, fail count, one line per workspace.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        color::header("Master report:"),
        color::literal(&summary.master_report_url)
    ));
    if let Some(cleanup) = &summary.cleanup {
        out.push_str(&color::context(&format!(
            "Deleted {} old clone(s), {} failed\n",
            cleanup.deleted.len(),
            cleanup.failed.len()
        )));
        out.push('\n');
    }
    let failed = summary.failed_count();
    out.push_str(&format!(
        "{} failed, out of {} tested\n",
        color::outcome(&failed.to_string(), failed > 0),
        summary.sessions.len()
    ));
    for session in &summary.sessions {
        out.push_str(&format_session(session));
        out.push('\n');
    }
    out
}

fn format_session(session: &SessionSummary) -> String {
    let failed = session.is_failure();
    match &session.outcome {
        SessionOutcome::Tested { status, workflows, report_url, .. } => format!(
            "  {:<9} {} {}{}",
            color::outcome(&status.to_string(), failed),
            color::literal(&session.origin.to_string()),
            color::context(&format!("({} workflows)", workflows)),
            report_url.as_deref().map(|url| format!(" {url}")).unwrap_or_default()
        ),
        SessionOutcome::Errored { error } => format!(
            "  {:<9} {} {}",
            color::outcome("ERROR", true),
            color::literal(&session.origin.to_string()),
            color::context(error)
        ),
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
