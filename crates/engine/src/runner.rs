// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test run driver: clone the featured workspaces, drive every session to
//! completion, then publish the reports and notify owners of failures.

use crate::cleanup::{cleanup_clones, CleanupReport, DEFAULT_MAX_AGE_DAYS};
use crate::clone::{clone_featured, discover_featured, CloneSettings};
use crate::report::{self, MasterContext, SessionSummary};
use crate::session::WorkspaceSession;
use fwt_adapters::{ApiError, Email, JobApi, NotifyAdapter, PublishError, ReportPublisher};
use fwt_core::{Clock, CLONE_TIME_FORMAT};
use indexmap::IndexMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CLONE_PROJECT: &str = "featured-workspace-testing";
pub const DEFAULT_SHARE_WITH: &str = "GROUP_FireCloud-Support@firecloud.org";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_ABORT_AFTER: Duration = Duration::from_secs(48 * 60 * 60);
pub const DEFAULT_SKIP: &[&str] = &["broad-firecloud-dsde-methods/GATK-Structural-Variants-Joint-Calling"];

/// Origins whose owners are never emailed.
pub const DO_NOT_NOTIFY: &[&str] = &[
    "help-gatk/Introduction-to-TCGA-Dataset",
    "help-gatk/Introduction-to-Target-Dataset",
    "kco-tech/Cumulus",
    "amp-t2d-op/2019_ASHG_Reproducible_GWAS-V2",
];

/// Errors that abort the whole run
#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not list featured workspaces: {0}")]
    Discovery(#[from] ApiError),
    #[error("could not publish master report: {0}")]
    Publish(#[from] PublishError),
}

/// Settings for one test run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub clone: CloneSettings,
    /// Minimum time between the starts of consecutive polling cycles
    pub poll_interval: Duration,
    /// Abort submissions of sessions running longer than this
    pub abort_after: Option<Duration>,
    pub call_cache: bool,
    pub notify: bool,
    pub query_costs: bool,
    /// Delete old clones before testing
    pub cleanup: bool,
    pub cleanup_age_days: i64,
    pub do_not_notify: Vec<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        let mut clone = CloneSettings::new(DEFAULT_CLONE_PROJECT);
        clone.share_with = Some(DEFAULT_SHARE_WITH.to_string());
        clone.skip = DEFAULT_SKIP.iter().map(|s| s.to_string()).collect();
        Self {
            clone,
            poll_interval: DEFAULT_POLL_INTERVAL,
            abort_after: Some(DEFAULT_ABORT_AFTER),
            call_cache: false,
            notify: true,
            query_costs: false,
            cleanup: true,
            cleanup_age_days: DEFAULT_MAX_AGE_DAYS,
            do_not_notify: DO_NOT_NOTIFY.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Adapters the runner talks through
#[derive(Clone)]
pub struct RunDeps<A, N, P, C> {
    pub api: A,
    pub notifier: N,
    pub publisher: P,
    pub clock: C,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub clone_time: String,
    pub sessions: Vec<SessionSummary>,
    pub master_report_url: String,
    pub cleanup: Option<CleanupReport>,
}

impl RunSummary {
    pub fn failed_count(&self) -> usize {
        self.sessions.iter().filter(|s| s.is_failure()).count()
    }
}

pub struct Runner<A, N, P, C> {
    config: RunConfig,
    api: A,
    notifier: N,
    publisher: P,
    clock: C,
}

impl<A, N, P, C> Runner<A, N, P, C>
where
    A: JobApi,
    N: NotifyAdapter,
    P: ReportPublisher,
    C: Clock,
{
    pub fn new(config: RunConfig, deps: RunDeps<A, N, P, C>) -> Self {
        Self {
            config,
            api: deps.api,
            notifier: deps.notifier,
            publisher: deps.publisher,
            clock: deps.clock,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Delete old clones in the clone project.
    pub async fn cleanup(&self) -> Result<CleanupReport, ApiError> {
        cleanup_clones(
            &self.api,
            &self.config.clone.clone_project,
            self.config.cleanup_age_days,
            self.clock.wall(),
        )
        .await
    }

    /// Run every selected featured workspace to completion.
    pub async fn run(&self) -> Result<RunSummary, RunError> {
        let cleanup = if self.config.cleanup {
            match self.cleanup().await {
                Ok(report) => Some(report),
                Err(e) => {
                    tracing::warn!(error = %e, "cleanup of old clones failed");
                    None
                }
            }
        } else {
            None
        };

        let cloned_at = self.clock.wall();
        let clone_time = cloned_at.format(CLONE_TIME_FORMAT).to_string();
        let featured = discover_featured(&self.api, &self.config.clone).await?;
        let cloned = clone_featured(&self.api, featured, &self.config.clone, cloned_at).await;

        let mut summaries = Vec::new();
        let mut active: IndexMap<String, WorkspaceSession<C>> = IndexMap::new();
        for ws in cloned {
            let origin = ws.origin.clone();
            let mut session = WorkspaceSession::new(ws, self.config.call_cache, self.clock.clone());
            if let Some(limit) = self.config.abort_after {
                session = session.abort_after(limit);
            }
            match session.enumerate(&self.api).await {
                Ok(()) => {
                    active.insert(origin.key(), session);
                }
                Err(e) => {
                    tracing::error!(workspace = %origin, error = %e, "could not plan submissions");
                    summaries.push(SessionSummary::errored(origin, e));
                }
            }
        }

        self.poll(&mut active, &mut summaries, &clone_time).await;

        let ctx = MasterContext {
            clone_time: &clone_time,
            finished: self.clock.wall(),
            call_cache: self.config.call_cache,
        };
        let html = report::master_report(&summaries, &ctx);
        let master_report_url =
            self.publisher.publish(&report::master_report_path(&clone_time), &html).await?;
        tracing::info!(
            url = %master_report_url,
            failed = summaries.iter().filter(|s| s.is_failure()).count(),
            tested = summaries.len(),
            "master report published"
        );

        Ok(RunSummary { clone_time, sessions: summaries, master_report_url, cleanup })
    }

    /// Drive all sessions until each has drained or stopped on an error.
    async fn poll(
        &self,
        active: &mut IndexMap<String, WorkspaceSession<C>>,
        summaries: &mut Vec<SessionSummary>,
        clone_time: &str,
    ) {
        let total = active.len();
        while !active.is_empty() {
            let cycle_start = self.clock.now();
            let keys: Vec<String> = active.keys().cloned().collect();
            for key in keys {
                let Some(session) = active.get_mut(&key) else {
                    continue;
                };
                if let Err(e) = session.drive(&self.api).await {
                    let origin = session.workspace().origin.clone();
                    tracing::error!(workspace = %origin, error = %e, "session stopped");
                    active.shift_remove(&key);
                    summaries.push(SessionSummary::errored(origin, e));
                    continue;
                }
                if session.is_drained() {
                    if let Some(mut session) = active.shift_remove(&key) {
                        self.finish(&mut session, clone_time).await;
                        summaries.push(SessionSummary::from_session(&session));
                    }
                }
            }
            tracing::info!(finished = total - active.len(), total, "workspaces finished");
            if active.is_empty() {
                break;
            }
            let spent = self.clock.now().saturating_duration_since(cycle_start);
            tokio::time::sleep(self.config.poll_interval.saturating_sub(spent)).await;
        }
    }

    /// Stop the timer, publish the workspace report and notify on failure.
    async fn finish(&self, session: &mut WorkspaceSession<C>, clone_time: &str) {
        session.stop();
        if self.config.query_costs {
            let total = session.fetch_costs(&self.api).await;
            tracing::info!(workspace = %session.clone_ref(), cost = %report::format_cost(total), "workspace cost");
        }

        let path = format!("{}/{}", clone_time, session.clone_ref().report_file_name());
        let html = report::workspace_report(session);
        match self.publisher.publish(&path, &html).await {
            Ok(url) => session.set_report_url(url),
            Err(e) => tracing::error!(workspace = %session.clone_ref(), error = %e, "report not published"),
        }

        let status = session.status();
        tracing::info!(
            workspace = %session.workspace().origin,
            %status,
            elapsed = %session.elapsed(),
            "workspace finished"
        );
        if status.is_failure() && self.should_notify(session) {
            self.notify_owners(session).await;
        }
    }

    fn should_notify(&self, session: &WorkspaceSession<C>) -> bool {
        let key = session.workspace().origin.key();
        if !self.config.notify {
            return false;
        }
        if self.config.do_not_notify.contains(&key) {
            tracing::info!(workspace = %key, "owners not notified: on do-not-notify list");
            return false;
        }
        true
    }

    /// Email the origin owners, then share the clone with them so they can inspect it.
    async fn notify_owners(&self, session: &WorkspaceSession<C>) {
        let ws = session.workspace();
        if ws.owners.is_empty() {
            tracing::warn!(workspace = %ws.origin, "no owners to notify");
            return;
        }
        let link = session
            .report_url()
            .map(str::to_string)
            .unwrap_or_else(|| ws.clone.job_history_link());
        let email = Email {
            to: ws.owners.clone(),
            subject: report::email_subject(&ws.origin),
            html: report::email_body(&ws.origin, &ws.clone, &link),
        };
        if let Err(e) = self.notifier.send(&email).await {
            tracing::error!(workspace = %ws.origin, error = %e, "failure notification not sent");
            return;
        }
        if let Err(e) = self.api.share_workspace(&ws.clone, &ws.owners).await {
            tracing::warn!(workspace = %ws.clone, error = %e, "could not share clone with owners");
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
