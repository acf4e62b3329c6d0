// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One workflow's single execution attempt against one data entity.
//!
//! A [`Submission`] owns its status transitions. Every mutation goes through a
//! checked method so the lifecycle invariants hold regardless of caller:
//!
//! - `final_status` is set at most once, and only once tracking is terminal
//! - a workflow id is never recorded without a submission id
//! - a rejected submission never carries remote identifiers

use crate::id::{SubmissionId, WorkflowId};
use crate::status::{FinalStatus, TrackingStatus};
use crate::workspace::WorkspaceRef;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors from invalid submission transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("{workflow}: already finalized as {status}")]
    AlreadyFinalized { workflow: String, status: FinalStatus },
    #[error("{workflow}: cannot finalize while {status}")]
    NotTerminal { workflow: String, status: TrackingStatus },
    #[error("{workflow}: {action} not allowed while {status}")]
    InvalidTransition { workflow: String, action: &'static str, status: TrackingStatus },
    #[error("{workflow}: no submission id recorded")]
    NotAccepted { workflow: String },
}

/// Immutable identity of a submission: what runs, where, against which entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionTarget {
    /// Billing project of the (cloned) workspace
    pub project: String,
    /// Name of the (cloned) workspace
    pub workspace: String,
    /// Namespace the method configuration lives in
    pub method_project: String,
    /// Method configuration name
    pub workflow_name: String,
    /// Representative entity, if the workflow takes one
    pub entity_name: Option<String>,
    pub entity_type: Option<String>,
    /// Batch expression for workflows that run over an entity set
    pub expression: Option<String>,
}

impl SubmissionTarget {
    pub fn new(
        project: impl Into<String>,
        workspace: impl Into<String>,
        method_project: impl Into<String>,
        workflow_name: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            workspace: workspace.into(),
            method_project: method_project.into(),
            workflow_name: workflow_name.into(),
            ..Self::default()
        }
    }

    /// The workspace this submission runs in.
    pub fn workspace_ref(&self) -> WorkspaceRef {
        WorkspaceRef::new(&self.project, &self.workspace)
    }

    crate::setters! {
        option {
            entity_name: String,
            entity_type: String,
            expression: String,
        }
    }
}

/// Outcome recorded by finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: FinalStatus,
    pub error: Option<String>,
    pub runtime: Option<Duration>,
}

impl Verdict {
    pub fn new(status: FinalStatus) -> Self {
        Self { status, error: None, runtime: None }
    }

    crate::setters! {
        option {
            error: String,
            runtime: Duration,
        }
    }
}

/// Tracked state of one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    target: SubmissionTarget,
    submission_id: Option<SubmissionId>,
    workflow_id: Option<WorkflowId>,
    status: TrackingStatus,
    final_status: Option<FinalStatus>,
    error: Option<String>,
    runtime: Option<Duration>,
    cost: Option<f64>,
}

crate::builder! {
    pub struct SubmissionBuilder => Submission {
        set {
            target: SubmissionTarget = SubmissionTarget::new("test-project", "test-ws", "methods", "wf"),
            status: TrackingStatus = TrackingStatus::Unsubmitted,
        }
        option {
            submission_id: SubmissionId = None,
            workflow_id: WorkflowId = None,
            final_status: FinalStatus = None,
            error: String = None,
            runtime: Duration = None,
        }
        computed {
            cost: Option<f64> = None,
        }
    }
}

impl Submission {
    pub fn new(target: SubmissionTarget) -> Self {
        Self {
            target,
            submission_id: None,
            workflow_id: None,
            status: TrackingStatus::Unsubmitted,
            final_status: None,
            error: None,
            runtime: None,
            cost: None,
        }
    }

    pub fn target(&self) -> &SubmissionTarget {
        &self.target
    }

    pub fn workflow_name(&self) -> &str {
        &self.target.workflow_name
    }

    pub fn submission_id(&self) -> Option<&SubmissionId> {
        self.submission_id.as_ref()
    }

    pub fn workflow_id(&self) -> Option<&WorkflowId> {
        self.workflow_id.as_ref()
    }

    pub fn status(&self) -> &TrackingStatus {
        &self.status
    }

    pub fn final_status(&self) -> Option<&FinalStatus> {
        self.final_status.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn runtime(&self) -> Option<Duration> {
        self.runtime
    }

    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_finalized(&self) -> bool {
        self.final_status.is_some()
    }

    fn require_unsubmitted(&self, action: &'static str) -> Result<(), SubmissionError> {
        if self.status == TrackingStatus::Unsubmitted {
            Ok(())
        } else {
            Err(SubmissionError::InvalidTransition {
                workflow: self.target.workflow_name.clone(),
                action,
                status: self.status.clone(),
            })
        }
    }

    /// The create call was accepted.
    pub fn mark_accepted(&mut self, id: SubmissionId) -> Result<(), SubmissionError> {
        self.require_unsubmitted("accept")?;
        self.submission_id = Some(id);
        self.status = TrackingStatus::Submitted;
        Ok(())
    }

    /// The create call was rejected. Terminal and final in one step.
    pub fn mark_rejected(&mut self, message: impl Into<String>) -> Result<(), SubmissionError> {
        self.require_unsubmitted("reject")?;
        self.status = TrackingStatus::Rejected;
        self.final_status = Some(FinalStatus::Rejected);
        self.error = Some(message.into());
        Ok(())
    }

    /// Skip without submitting; counts as passing.
    pub fn skip_not_tested(&mut self, message: impl Into<String>) -> Result<(), SubmissionError> {
        self.require_unsubmitted("skip")?;
        self.status = TrackingStatus::Done;
        self.final_status = Some(FinalStatus::NotTested);
        self.error = Some(message.into());
        Ok(())
    }

    /// Record the remote status observed by a poll.
    pub fn record_status(&mut self, status: TrackingStatus) -> Result<(), SubmissionError> {
        if !self.status.is_pending() {
            return Err(SubmissionError::InvalidTransition {
                workflow: self.target.workflow_name.clone(),
                action: "poll",
                status: self.status.clone(),
            });
        }
        self.status = status;
        Ok(())
    }

    /// Record the workflow id the first time the remote reports one.
    ///
    /// Later ids are ignored.
    pub fn record_workflow_id(&mut self, id: WorkflowId) -> Result<(), SubmissionError> {
        if self.submission_id.is_none() {
            return Err(SubmissionError::NotAccepted { workflow: self.target.workflow_name.clone() });
        }
        if self.workflow_id.is_none() {
            self.workflow_id = Some(id);
        }
        Ok(())
    }

    /// Set the authoritative outcome. Allowed once, after tracking is terminal.
    pub fn set_final(&mut self, verdict: Verdict) -> Result<(), SubmissionError> {
        if let Some(status) = &self.final_status {
            return Err(SubmissionError::AlreadyFinalized {
                workflow: self.target.workflow_name.clone(),
                status: status.clone(),
            });
        }
        if !self.status.is_terminal() {
            return Err(SubmissionError::NotTerminal {
                workflow: self.target.workflow_name.clone(),
                status: self.status.clone(),
            });
        }
        self.final_status = Some(verdict.status);
        if verdict.error.is_some() {
            self.error = verdict.error;
        }
        self.runtime = verdict.runtime;
        Ok(())
    }

    pub fn set_cost(&mut self, cost: f64) {
        self.cost = Some(cost);
    }
}

#[cfg(test)]
#[path = "submission_tests.rs"]
mod tests;
