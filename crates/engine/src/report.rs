// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTML rendering for submissions, workspace reports, the master report and
//! failure emails. Everything here is pure; publishing happens in the runner.

use crate::session::WorkspaceSession;
use chrono::{DateTime, Utc};
use fwt_core::{
    format_duration, links, Clock, FinalStatus, SessionStatus, Submission, TrackingStatus,
    WorkspaceRef, CLONE_TIME_FORMAT,
};
use std::fmt::Write as _;

const PAGE_STYLE: &str =
    "font-family:Montserrat,sans-serif; font-size:18px; padding:30; background-color:#FAFBFD";
const BANNER_STYLE: &str = "background-color:#82AA52; color:#FAFBFD; height:100px";
const TABLE_STYLE: &str = "<style>
table { font-family: Montserrat, sans-serif; border-collapse: collapse; width: 100%; }
td, th { border: 1px solid #dddddd; text-align: left; padding: 8px; }
</style>";

/// Escape text that came from the remote API before embedding it in HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Undo [`escape`], for text read back from a published report.
pub fn unescape(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

pub fn call_cache_text(call_cache: bool) -> &'static str {
    if call_cache {
        "Call Caching ON (enabled)"
    } else {
        "Call Caching OFF (disabled)"
    }
}

/// Dollar amount with two decimals, e.g. `$1.75`.
pub fn format_cost(cost: f64) -> String {
    format!("${:.2}", cost)
}

/// Where to look for details: the job viewer when a workflow ran, else the
/// submission's history page, else the workspace's job history.
pub fn submission_link(sub: &Submission) -> String {
    let target = sub.target();
    match (sub.workflow_id(), sub.submission_id()) {
        (Some(workflow_id), _) => links::job_manager(workflow_id.as_str()),
        (None, Some(submission_id)) => {
            links::job_history(&target.project, &target.workspace, Some(submission_id.as_str()))
        }
        (None, None) => links::job_history(&target.project, &target.workspace, None),
    }
}

/// HTML fragment describing one submission's outcome.
pub fn render_submission(sub: &Submission) -> String {
    let final_status = sub.final_status();
    let detail = sub.error().map(escape).unwrap_or_default();
    let (color, note) = match final_status {
        Some(s) if s.is_error() => {
            ("red", format!("<br>Error message: <font color=red>{}</font>", detail))
        }
        Some(FinalStatus::Aborted) => ("orange", String::new()),
        _ if sub.status() == &TrackingStatus::Aborted => ("orange", String::new()),
        Some(FinalStatus::NotTested) => ("orange", format!("<br>Note: {}", detail)),
        _ => ("green", String::new()),
    };
    let status = final_status.map(ToString::to_string).unwrap_or_else(|| sub.status().to_string());
    let runtime = sub
        .runtime()
        .map(|r| format!("<br>Runtime: {}", format_duration(r)))
        .unwrap_or_default();

    let mut html = String::new();
    let _ = writeln!(html, "Workflow Id: {}", sub.workflow_id().map_or("n/a", |w| w.as_str()));
    let _ = writeln!(html, "<br>Submission Id: {}", sub.submission_id().map_or("n/a", |s| s.as_str()));
    let _ = writeln!(
        html,
        "<br>Entity Name: {}",
        sub.target().entity_name.as_deref().map_or_else(|| "n/a".to_string(), escape)
    );
    let _ = writeln!(html, "<br>Status: <font color={}>{}</font>", color, status);
    if !note.is_empty() {
        let _ = writeln!(html, "{}", note);
    }
    if !runtime.is_empty() {
        let _ = writeln!(html, "{}", runtime);
    }
    let _ = writeln!(
        html,
        "<br><a href={} target='_blank'>Click here for more details</a>",
        submission_link(sub)
    );
    html.push_str("<br><br>\n");
    html
}

/// `<status>: <workflow>` lines for every completed submission that did not pass.
pub fn failed_list<'a>(completed: impl IntoIterator<Item = &'a Submission>) -> String {
    completed
        .into_iter()
        .filter(|s| !s.final_status().is_some_and(FinalStatus::is_passing))
        .map(|s| {
            let status = s.final_status().map(ToString::to_string).unwrap_or_default();
            failed_line(&status, s.workflow_name())
        })
        .collect()
}

/// One entry of a failed-workflow list.
pub fn failed_line(status: &str, workflow: &str) -> String {
    format!("<font color=red>{}</font>: {}<br>", status, escape(workflow))
}

fn page_header(title: &str) -> String {
    format!(
        "<center><div style='{}'>\n<h1><span style='vertical-align: middle;'>{}</span></h1></div></center>\n",
        BANNER_STYLE, title
    )
}

/// Full HTML report for one finished session.
pub fn workspace_report<C: Clock>(session: &WorkspaceSession<C>) -> String {
    let ws = session.workspace();
    let status = session.status();
    let completed: Vec<&Submission> = session.completed().collect();
    let workflow_names: Vec<String> = completed.iter().map(|s| escape(s.workflow_name())).collect();

    let mut html = String::new();
    let _ = writeln!(html, "<html>\n<head></head>\n<body style='{}'>", PAGE_STYLE);
    html.push_str(&page_header("Featured Workspace Report"));
    let _ = writeln!(
        html,
        "<center><h1><font color={}>{}</font></h1></center><br><br>",
        status.color(),
        status
    );
    let _ = writeln!(
        html,
        "<h2><b>Cloned Workspace: </b><a href={} target='_blank'>{}</a></h2>",
        ws.clone.job_history_link(),
        escape(&ws.clone.name)
    );
    let _ = writeln!(html, "<big><b>Featured Workspace: </b>{}</big><br>", escape(&ws.origin.name));
    let _ = writeln!(html, "<big><b>Billing Project: </b>{}</big><br><br>", escape(&ws.origin.project));
    let _ = writeln!(html, "Test runtime: {}", session.elapsed().to_html());
    if let Some(cost) = session.total_cost() {
        let _ = writeln!(html, "<br>Test cost: {}", format_cost(cost));
    }
    let _ = writeln!(html, "<br>{}", call_cache_text(session.call_cache()));
    let _ = writeln!(html, "<br><br><big><b>Workflows: </b>{}</big>", workflow_names.join(", "));
    let _ = writeln!(html, "<br><big><b>Notebooks: </b>These tests do not currently test notebooks</big>");
    html.push_str("<h2>Workflows:</h2>\n<blockquote>\n");
    for (name, sub) in workflow_names.iter().zip(&completed) {
        let _ = writeln!(html, "<h3>{}</h3><blockquote>{}</blockquote>", name, render_submission(sub));
    }
    html.push_str("</blockquote>\n</body>\n</html>\n");
    html
}

/// Outcome of one workspace, as listed in the master report.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionOutcome {
    Tested {
        status: SessionStatus,
        workflows: usize,
        failed_html: String,
        report_url: Option<String>,
        runtime_html: String,
        cost: Option<f64>,
    },
    /// The session stopped on an error before it could finish
    Errored { error: String },
}

/// One row of the master report.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub origin: WorkspaceRef,
    pub outcome: SessionOutcome,
}

impl SessionSummary {
    pub fn from_session<C: Clock>(session: &WorkspaceSession<C>) -> Self {
        Self {
            origin: session.workspace().origin.clone(),
            outcome: SessionOutcome::Tested {
                status: session.status(),
                workflows: session.completed().count(),
                failed_html: failed_list(session.completed()),
                report_url: session.report_url().map(str::to_string),
                runtime_html: session.elapsed().to_html(),
                cost: session.total_cost(),
            },
        }
    }

    pub fn errored(origin: WorkspaceRef, error: impl ToString) -> Self {
        Self { origin, outcome: SessionOutcome::Errored { error: error.to_string() } }
    }

    /// Errored sessions count as failures.
    pub fn is_failure(&self) -> bool {
        match &self.outcome {
            SessionOutcome::Tested { status, .. } => status.is_failure(),
            SessionOutcome::Errored { .. } => true,
        }
    }
}

/// Inputs to the master report besides the per-workspace rows.
#[derive(Debug, Clone)]
pub struct MasterContext<'a> {
    pub clone_time: &'a str,
    pub finished: DateTime<Utc>,
    pub call_cache: bool,
}

/// One HTML table over all tested workspaces: failures first, then
/// successes, each alphabetical by `project/workspace`.
pub fn master_report(rows: &[SessionSummary], ctx: &MasterContext<'_>) -> String {
    let mut ordered: Vec<&SessionSummary> = rows.iter().collect();
    ordered.sort_by_key(|r| (!r.is_failure(), r.origin.key()));
    let fail_count = rows.iter().filter(|r| r.is_failure()).count();

    let mut html = String::new();
    let _ = writeln!(html, "<html>\n<head>\n{}\n</head>\n<body style='{}'>", TABLE_STYLE, PAGE_STYLE);
    html.push_str(&page_header("Featured Workspace Report: Master list"));
    let _ = writeln!(
        html,
        "<br><center><big><font color=red>{}</font> failed, out of {} tested</big><br>{}</center><br><br>",
        fail_count,
        rows.len(),
        call_cache_text(ctx.call_cache)
    );
    html.push_str(
        "<table>\n<tr><th>Project</th><th>Featured Workspace</th><th># WFs tested</th>\
         <th>Status</th><th>Report link</th><th>Failed Workflows</th><th>Runtime</th><th>Cost</th></tr>\n",
    );
    for row in ordered {
        let project = escape(&row.origin.project);
        let name = escape(&row.origin.name);
        match &row.outcome {
            SessionOutcome::Tested { status, workflows, failed_html, report_url, runtime_html, cost } => {
                let link = report_url
                    .as_deref()
                    .map(|u| format!("<a href={} target='_blank'>[open report for details]</a>", u))
                    .unwrap_or_default();
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td><big>{}</big></td><td>{}</td><td><font color={}>{}</font></td>\
                     <td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    project,
                    name,
                    workflows,
                    status.color(),
                    status,
                    link,
                    failed_html,
                    runtime_html,
                    cost.map(format_cost).unwrap_or_default()
                );
            }
            SessionOutcome::Errored { error } => {
                let _ = writeln!(
                    html,
                    "<tr><td>{}</td><td><big>{}</big></td><td>0</td><td><font color=red>ERROR</font></td>\
                     <td></td><td>{}</td><td></td><td></td></tr>",
                    project,
                    name,
                    escape(error)
                );
            }
        }
    }
    html.push_str("</table><br>\n");
    let _ = writeln!(html, "<br><br>Test started: {}", ctx.clone_time);
    let _ = writeln!(html, "<br>Test finished: {}", ctx.finished.format(CLONE_TIME_FORMAT));
    html.push_str("</body>\n</html>\n");
    html
}

/// Where the master report for `clone_time` lives under the report root.
pub fn master_report_path(clone_time: &str) -> String {
    format!("master_report_{}.html", clone_time)
}

/// Subject line of the failure email.
pub fn email_subject(origin: &WorkspaceRef) -> String {
    format!("Workflow error(s) in Terra Featured Workspace {}", origin.name)
}

/// Body of the failure email sent to the owners of `origin`.
pub fn email_body(origin: &WorkspaceRef, clone: &WorkspaceRef, report_url: &str) -> String {
    format!(
        "Greetings! <br><br>\n\
         An automated test of the workflow(s) in <b>{origin}</b> failed. \
         You are receiving this message because you are an owner of this workspace.\n\
         <br><br>\n\
         Please <a href=\"{report_url}\">examine the report</a> to see what went wrong and save any needed changes.\n\
         <br><br>\n\
         If you need help configuring your Featured Workspace workflows, please \
         <a href=\"https://support.terra.bio/hc/en-us/articles/360033599791\">check out the requirements here</a>. \
         If you still have questions, contact terra-support@broadinstitute.org, or simply reply to this email.\n\
         <br><br>\n\
         Best,<br>\nTerra Customer Delivery Team\n\
         <br><br>\n\
         P.S. The cloned workspace <b>{clone}</b> has been shared with you so you can inspect the failed run.\n"
    )
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;
