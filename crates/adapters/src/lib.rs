// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! fwt-adapters: I/O boundaries (remote job API, email, report storage)

pub mod api;
pub mod auth;
pub mod notify;
pub mod publish;
pub mod retry;
pub mod subprocess;

pub use api::{
    AbortOutcome, ApiError, CloneOptions, CreateOutcome, CreateSubmission, EntityRef,
    FailureCause, HttpJobApi, JobApi, MethodConfig, RemoteSubmission, RemoteWorkflow,
    WorkflowFailure, WorkflowMetadata, WorkspaceDetails, WorkspaceInfo, DEFAULT_API_URL,
};
pub use auth::{AuthError, TokenCache};
pub use notify::{Email, NotifyAdapter, NotifyError, SendGridNotifier};
pub use publish::{
    listed_files, DirectoryPublisher, GsutilPublisher, PublishError, ReportPublisher,
};
pub use retry::{RetryPolicy, Retrying};

#[cfg(any(test, feature = "test-support"))]
pub use api::{remote_submission, ApiCall, FakeJobApi};
#[cfg(any(test, feature = "test-support"))]
pub use auth::FakeTokenSource;
#[cfg(any(test, feature = "test-support"))]
pub use notify::FakeNotifyAdapter;
#[cfg(any(test, feature = "test-support"))]
pub use publish::{FakePublisher, Published};
