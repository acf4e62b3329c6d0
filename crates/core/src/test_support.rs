// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Submission, SubmissionId, SubmissionTarget, TrackingStatus, WorkflowId};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core state machine types.
pub mod strategies {
    use crate::status::{FinalStatus, TrackingStatus};
    use proptest::prelude::*;

    pub fn arb_final_status() -> impl Strategy<Value = FinalStatus> {
        prop_oneof![
            Just(FinalStatus::Succeeded),
            Just(FinalStatus::Failed),
            Just(FinalStatus::Aborted),
            Just(FinalStatus::Rejected),
            Just(FinalStatus::NotTested),
            "[A-Z][a-z]{2,8}".prop_map(FinalStatus::Other),
        ]
    }

    pub fn arb_tracking_status() -> impl Strategy<Value = TrackingStatus> {
        prop_oneof![
            Just(TrackingStatus::Unsubmitted),
            Just(TrackingStatus::Submitted),
            prop_oneof![Just("Accepted"), Just("Evaluating"), Just("Submitting"), Just("Aborting")]
                .prop_map(|s| TrackingStatus::Active(s.to_string())),
            Just(TrackingStatus::Done),
            Just(TrackingStatus::Aborted),
            Just(TrackingStatus::Rejected),
        ]
    }
}

// ── Submission factories ────────────────────────────────────────────────

pub fn target(workflow: &str) -> SubmissionTarget {
    SubmissionTarget::new("test-project", "test-ws_2026-03-14-09-26-53", "methods", workflow)
        .entity_name("sample_test")
        .entity_type("sample")
}

/// A submission accepted remotely and still pending.
pub fn pending_submission(workflow: &str, submission_id: &str) -> Submission {
    Submission::builder()
        .target(target(workflow))
        .status(TrackingStatus::Submitted)
        .submission_id(SubmissionId::new(submission_id))
        .build()
}

/// A submission the remote reports as done, with a workflow id recorded.
pub fn done_submission(workflow: &str, submission_id: &str, workflow_id: &str) -> Submission {
    Submission::builder()
        .target(target(workflow))
        .status(TrackingStatus::Done)
        .submission_id(SubmissionId::new(submission_id))
        .workflow_id(WorkflowId::new(workflow_id))
        .build()
}
