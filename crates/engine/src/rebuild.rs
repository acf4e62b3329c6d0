// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Regenerating a master report from workspace reports that were already
//! published, e.g. after a run died before writing its master report.

use crate::report::{
    self, call_cache_text, failed_line, unescape, MasterContext, SessionOutcome, SessionSummary,
};
use chrono::{DateTime, Utc};
use fwt_adapters::{PublishError, ReportPublisher};
use fwt_core::{FinalStatus, SessionStatus, WorkspaceRef};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RebuildError {
    #[error(transparent)]
    Publish(#[from] PublishError),
    #[error("no workspace reports found under {0}/")]
    Empty(String),
}

/// What a published workspace report says about its session.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReport {
    pub origin: WorkspaceRef,
    pub status: SessionStatus,
    /// `(workflow, final status label)` in report order
    pub workflows: Vec<(String, String)>,
    pub runtime_html: String,
    pub cost: Option<f64>,
    pub call_cache: bool,
}

impl ParsedReport {
    fn failed_html(&self) -> String {
        let passing = [FinalStatus::Succeeded.to_string(), FinalStatus::NotTested.to_string()];
        self.workflows
            .iter()
            .filter(|(_, status)| !passing.contains(status))
            .map(|(name, status)| failed_line(status, name))
            .collect()
    }

    pub fn into_summary(self, report_url: String) -> SessionSummary {
        let failed_html = self.failed_html();
        SessionSummary {
            origin: self.origin,
            outcome: SessionOutcome::Tested {
                status: self.status,
                workflows: self.workflows.len(),
                failed_html,
                report_url: Some(report_url),
                runtime_html: self.runtime_html,
                cost: self.cost,
            },
        }
    }
}

fn between<'a>(text: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = text.find(start)? + start.len();
    let len = text[from..].find(end)?;
    Some(&text[from..from + len])
}

/// Text of the first `<font color=..>TEXT</font>` after `start`.
fn font_text<'a>(text: &'a str, start: &str) -> Option<&'a str> {
    let tagged = between(text, start, "</font>")?;
    tagged.split_once('>').map(|(_, inner)| inner)
}

/// Read back a report written by [`report::workspace_report`].
///
/// Returns `None` when the page lacks the status banner or the origin fields.
pub fn parse_workspace_report(html: &str) -> Option<ParsedReport> {
    let status = match font_text(html, "<center><h1><font color=")? {
        "SUCCESS!" => SessionStatus::Success,
        "FAILURE!" => SessionStatus::Failure,
        _ => return None,
    };
    let name = between(html, "<big><b>Featured Workspace: </b>", "</big>")?;
    let project = between(html, "<big><b>Billing Project: </b>", "</big>")?;
    let workflows = html
        .split("<h3>")
        .skip(1)
        .filter_map(|chunk| {
            let name = chunk.split_once("</h3>")?.0;
            let status = font_text(chunk, "<br>Status: <font color=")?;
            Some((unescape(name), status.to_string()))
        })
        .collect();

    Some(ParsedReport {
        origin: WorkspaceRef::new(unescape(project), unescape(name)),
        status,
        workflows,
        runtime_html: between(html, "Test runtime: ", "\n").unwrap_or_default().to_string(),
        cost: between(html, "<br>Test cost: $", "\n").and_then(|c| c.trim().parse().ok()),
        call_cache: html.contains(call_cache_text(true)),
    })
}

/// A regenerated master report
#[derive(Debug, Clone)]
pub struct RebuiltMaster {
    pub url: String,
    pub rows: Vec<SessionSummary>,
    /// Files in the folder that were not workspace reports
    pub skipped: Vec<String>,
}

/// Rebuild and republish the master report of the run started at `clone_time`
/// from the workspace reports published under `<clone_time>/`.
pub async fn rebuild_master<P: ReportPublisher>(
    publisher: &P,
    clone_time: &str,
    finished: DateTime<Utc>,
) -> Result<RebuiltMaster, RebuildError> {
    let mut rows = Vec::new();
    let mut skipped = Vec::new();
    let mut call_cache = false;
    for path in publisher.list(clone_time).await? {
        let parsed = if path.ends_with(".html") {
            parse_workspace_report(&publisher.read(&path).await?)
        } else {
            None
        };
        match parsed {
            Some(parsed) => {
                tracing::debug!(%path, origin = %parsed.origin, status = %parsed.status, "report read");
                call_cache |= parsed.call_cache;
                let url = publisher.url(&path);
                rows.push(parsed.into_summary(url));
            }
            None => {
                tracing::warn!(%path, "not a workspace report, skipped");
                skipped.push(path);
            }
        }
    }
    if rows.is_empty() {
        return Err(RebuildError::Empty(clone_time.to_string()));
    }

    let ctx = MasterContext { clone_time, finished, call_cache };
    let html = report::master_report(&rows, &ctx);
    let url = publisher.publish(&report::master_report_path(clone_time), &html).await?;
    tracing::info!(%url, workspaces = rows.len(), "master report rebuilt");
    Ok(RebuiltMaster { url, rows, skipped })
}

#[cfg(test)]
#[path = "rebuild_tests.rs"]
mod tests;
