// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote operations on a single [`Submission`].
//!
//! Each operation issues the API calls for one lifecycle step and applies the
//! result through the submission's checked transitions.

use crate::session::SessionError;
use fwt_adapters::{AbortOutcome, CreateOutcome, CreateSubmission, JobApi, RemoteSubmission};
use fwt_core::{FinalStatus, Submission, SubmissionError, TrackingStatus, Verdict};

/// Detail recorded when a submission without a workflow reports an odd status.
pub const UNRECOGNIZED_STATUS: &str = "unrecognized status";

fn require_id(sub: &Submission) -> Result<fwt_core::SubmissionId, SessionError> {
    sub.submission_id().cloned().ok_or_else(|| {
        SessionError::Submission(SubmissionError::NotAccepted {
            workflow: sub.workflow_name().to_string(),
        })
    })
}

/// Send the create call. Accepted submissions become pending; rejected ones
/// become terminal with their rejection recorded as the final status.
pub async fn create<A: JobApi>(
    api: &A,
    sub: &mut Submission,
    call_cache: bool,
) -> Result<(), SessionError> {
    let ws = sub.target().workspace_ref();
    let request = CreateSubmission::new(sub.target(), call_cache);
    match api.create_submission(&ws, &request).await? {
        CreateOutcome::Accepted(id) => {
            tracing::info!(workspace = %ws, workflow = sub.workflow_name(), submission_id = %id, "submission created");
            sub.mark_accepted(id)?;
        }
        CreateOutcome::Rejected { status, message } => {
            tracing::warn!(
                workspace = %ws,
                workflow = sub.workflow_name(),
                status,
                %message,
                "submission rejected"
            );
            sub.mark_rejected(message)?;
        }
    }
    Ok(())
}

/// Fetch the remote status, recording the workflow id once one shows up.
///
/// With several workflows listed, the last one with an id is tracked.
pub async fn poll<A: JobApi>(api: &A, sub: &mut Submission) -> Result<(), SessionError> {
    let id = require_id(sub)?;
    let ws = sub.target().workspace_ref();
    let remote = api.get_submission(&ws, &id).await?;
    if let Some(workflow_id) = remote.workflows.iter().rev().find_map(|w| w.workflow_id.clone()) {
        sub.record_workflow_id(workflow_id)?;
    }
    let status = TrackingStatus::from_remote(&remote.status);
    tracing::debug!(workspace = %ws, workflow = sub.workflow_name(), %status, "polled");
    sub.record_status(status)?;
    Ok(())
}

/// Determine the authoritative outcome of a terminal submission.
///
/// How much detail is available depends on how far the submission got:
/// a workflow run has metadata, an accepted submission without a workflow has
/// per-workflow messages, and a rejected submission has only its tracking status.
pub async fn finalize<A: JobApi>(api: &A, sub: &mut Submission) -> Result<(), SessionError> {
    let workflow = sub.workflow_name().to_string();
    if let Some(status) = sub.final_status() {
        return Err(SubmissionError::AlreadyFinalized { workflow, status: status.clone() }.into());
    }
    if !sub.is_terminal() {
        return Err(SubmissionError::NotTerminal { workflow, status: sub.status().clone() }.into());
    }
    let ws = sub.target().workspace_ref();
    let verdict = match (sub.submission_id(), sub.workflow_id()) {
        (Some(submission_id), Some(workflow_id)) => {
            let meta = api.get_workflow_metadata(&ws, submission_id, workflow_id).await?;
            let status = FinalStatus::from_workflow(&meta.status);
            let mut verdict = Verdict::new(status.clone());
            if let (Some(start), Some(end)) = (meta.start, meta.end) {
                verdict.runtime = (end - start).to_std().ok();
            }
            if status == FinalStatus::Failed {
                verdict.error = Some(meta.failure_messages());
            }
            verdict
        }
        (Some(submission_id), None) => {
            let remote = api.get_submission(&ws, submission_id).await?;
            verdict_without_workflow(&remote)
        }
        _ => match FinalStatus::from_tracking(sub.status()) {
            Some(status) => Verdict::new(status),
            None => {
                return Err(SubmissionError::NotTerminal { workflow, status: sub.status().clone() }
                    .into())
            }
        },
    };
    tracing::info!(
        workspace = %ws,
        workflow = sub.workflow_name(),
        final_status = %verdict.status,
        "submission finalized"
    );
    sub.set_final(verdict)?;
    Ok(())
}

fn verdict_without_workflow(remote: &RemoteSubmission) -> Verdict {
    let Some(last) = remote.workflows.last() else {
        return Verdict::new(FinalStatus::Failed).error("no workflow reported for submission");
    };
    let status = FinalStatus::from_workflow(&last.status);
    match status {
        FinalStatus::Failed => {
            let messages: String = remote
                .workflows
                .iter()
                .flat_map(|w| w.messages.iter())
                .map(String::as_str)
                .collect();
            Verdict::new(status).error(messages)
        }
        FinalStatus::Succeeded => Verdict::new(status),
        _ => Verdict::new(status).error(UNRECOGNIZED_STATUS),
    }
}

/// Request an abort. A submission that no longer exists is not an error.
pub async fn abort<A: JobApi>(api: &A, sub: &Submission) -> Result<(), SessionError> {
    let id = require_id(sub)?;
    let ws = sub.target().workspace_ref();
    match api.abort_submission(&ws, &id).await? {
        AbortOutcome::Requested => {
            tracing::warn!(workspace = %ws, workflow = sub.workflow_name(), "abort requested")
        }
        AbortOutcome::NotFound => {
            tracing::info!(workspace = %ws, workflow = sub.workflow_name(), "abort: submission already gone")
        }
    }
    Ok(())
}

/// Record the cost the remote reports for an accepted submission.
///
/// Returns `None` for submissions that never reached the remote or have no cost yet.
pub async fn fetch_cost<A: JobApi>(
    api: &A,
    sub: &mut Submission,
) -> Result<Option<f64>, SessionError> {
    let Some(id) = sub.submission_id().cloned() else {
        return Ok(None);
    };
    let remote = api.get_submission(&sub.target().workspace_ref(), &id).await?;
    if let Some(cost) = remote.cost {
        sub.set_cost(cost);
    }
    Ok(remote.cost)
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
