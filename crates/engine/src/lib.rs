// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fwt-engine: submission lifecycle, workspace sessions, and the test run driver

pub mod batching;
pub mod cleanup;
pub mod clone;
pub mod history;
pub mod rebuild;
pub mod report;
pub mod runner;
pub mod session;
pub mod submission;

pub use batching::{is_explicitly_ordered, pick_entity, plan_batches, SET_TYPE_WORKFLOWS};
pub use cleanup::{cleanup_clones, CleanupReport};
pub use clone::{clone_featured, discover_featured, CloneSettings, FeaturedWorkspace};
pub use history::{run_costs, RunCost};
pub use rebuild::{parse_workspace_report, rebuild_master, ParsedReport, RebuildError, RebuiltMaster};
pub use report::{SessionOutcome, SessionSummary};
pub use runner::{RunConfig, RunDeps, RunError, RunSummary, Runner};
pub use session::{SessionError, WorkspaceSession};
