// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Submission and session status vocabularies.
//!
//! The remote API reports statuses as free-form strings. They are translated
//! exactly once, here, so the rest of the crate matches on enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse lifecycle of a submission as the session tracks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackingStatus {
    /// Not yet sent to the remote API
    #[default]
    Unsubmitted,
    /// Accepted by the create call; no remote status observed yet
    Submitted,
    /// A non-terminal remote status (label kept verbatim for progress logs)
    Active(String),
    /// Remote reports the submission finished
    Done,
    /// Remote reports the submission was aborted
    Aborted,
    /// The create call was rejected; the submission never existed remotely
    Rejected,
}

impl TrackingStatus {
    /// Translate a remote submission status label.
    pub fn from_remote(label: &str) -> Self {
        match label {
            "Done" => TrackingStatus::Done,
            "Aborted" => TrackingStatus::Aborted,
            other => TrackingStatus::Active(other.to_string()),
        }
    }

    /// Terminal set: no further transition is expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TrackingStatus::Done | TrackingStatus::Aborted | TrackingStatus::Rejected)
    }

    /// Accepted remotely and not yet terminal.
    pub fn is_pending(&self) -> bool {
        matches!(self, TrackingStatus::Submitted | TrackingStatus::Active(_))
    }
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingStatus::Unsubmitted => write!(f, "unsubmitted"),
            TrackingStatus::Submitted => write!(f, "submitted"),
            TrackingStatus::Active(label) => write!(f, "{}", label),
            TrackingStatus::Done => write!(f, "Done"),
            TrackingStatus::Aborted => write!(f, "Aborted"),
            TrackingStatus::Rejected => write!(f, "Submission Failed"),
        }
    }
}

/// Authoritative outcome of a submission once it is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinalStatus {
    Succeeded,
    Failed,
    Aborted,
    /// Rejected by the create call ("Submission Failed")
    Rejected,
    /// Deliberately skipped (optional workflows)
    NotTested,
    /// Any other workflow status the remote reports
    Other(String),
}

impl FinalStatus {
    /// Translate a remote workflow status label.
    pub fn from_workflow(label: &str) -> Self {
        match label {
            "Succeeded" => FinalStatus::Succeeded,
            "Failed" => FinalStatus::Failed,
            "Aborted" => FinalStatus::Aborted,
            other => FinalStatus::Other(other.to_string()),
        }
    }

    /// Outcome carried over from a terminal tracking status, for submissions
    /// that never produced remote identifiers.
    pub fn from_tracking(status: &TrackingStatus) -> Option<Self> {
        match status {
            TrackingStatus::Rejected => Some(FinalStatus::Rejected),
            TrackingStatus::Aborted => Some(FinalStatus::Aborted),
            TrackingStatus::Done => Some(FinalStatus::Other("Done".to_string())),
            _ => None,
        }
    }

    /// Outcomes that do not fail the session.
    pub fn is_passing(&self) -> bool {
        matches!(self, FinalStatus::Succeeded | FinalStatus::NotTested)
    }

    /// Outcomes reported in red with their error detail.
    pub fn is_error(&self) -> bool {
        matches!(self, FinalStatus::Failed | FinalStatus::Rejected)
    }
}

impl fmt::Display for FinalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalStatus::Succeeded => write!(f, "Succeeded"),
            FinalStatus::Failed => write!(f, "Failed"),
            FinalStatus::Aborted => write!(f, "Aborted"),
            FinalStatus::Rejected => write!(f, "Submission Failed"),
            FinalStatus::NotTested => write!(f, "Not tested"),
            FinalStatus::Other(label) => write!(f, "{}", label),
        }
    }
}

/// Overall verdict of a workspace test session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Success,
    Failure,
}

impl SessionStatus {
    /// Failure iff any outcome is neither succeeded nor not-tested.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = Option<&'a FinalStatus>>) -> Self {
        let failed = outcomes.into_iter().any(|s| !s.is_some_and(FinalStatus::is_passing));
        if failed {
            SessionStatus::Failure
        } else {
            SessionStatus::Success
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, SessionStatus::Failure)
    }

    /// Colour used for the status banner.
    pub fn color(&self) -> &'static str {
        match self {
            SessionStatus::Success => "green",
            SessionStatus::Failure => "red",
        }
    }
}

crate::simple_display! {
    SessionStatus {
        Success => "SUCCESS!",
        Failure => "FAILURE!",
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
