// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fwt-core: state types for the featured workspace tester

pub mod macros;

pub mod clock;
pub mod id;
pub mod links;
pub mod status;
pub mod submission;
pub mod time_fmt;
pub mod workspace;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use id::{SubmissionId, WorkflowId};
pub use status::{FinalStatus, SessionStatus, TrackingStatus};
#[cfg(any(test, feature = "test-support"))]
pub use submission::SubmissionBuilder;
pub use submission::{Submission, SubmissionError, SubmissionTarget, Verdict};
pub use time_fmt::{format_duration, Elapsed};
pub use workspace::{clone_timestamp, ClonedWorkspace, WorkspaceRef, CLONE_TIME_FORMAT};
