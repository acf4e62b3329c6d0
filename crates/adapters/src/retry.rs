// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry for remote calls.
//!
//! Only transient errors are retried (see [`ApiError::is_transient`]). Codes a
//! call declares as expected never reach this layer as errors.

use crate::api::{
    AbortOutcome, ApiError, CloneOptions, CreateOutcome, CreateSubmission, EntityRef, JobApi,
    MethodConfig, RemoteSubmission, WorkflowMetadata, WorkspaceDetails,
};
use async_trait::async_trait;
use fwt_core::{SubmissionId, WorkflowId, WorkspaceRef};
use std::future::Future;
use std::time::Duration;

/// Attempt ceiling and the delay schedule between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: usize,
    /// Delay before attempt `n + 2` is `delays[n]`; the last entry repeats.
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            delays: [1, 5, 10, 30, 60].into_iter().map(Duration::from_secs).collect(),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self { attempts: 1, delays: Vec::new() }
    }

    fn delay(&self, failed_attempts: usize) -> Duration {
        let idx = failed_attempts.saturating_sub(1);
        self.delays.get(idx).or(self.delays.last()).copied().unwrap_or_default()
    }

    /// Run `call` until it succeeds, fails permanently, or attempts run out.
    pub async fn run<T, F, Fut>(&self, op: &str, mut call: F) -> Result<T, ApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(err) if !err.is_transient() => return Err(err),
                Err(err) if attempt >= attempts => {
                    if attempts == 1 {
                        return Err(err);
                    }
                    return Err(ApiError::Exhausted { attempts, last: Box::new(err) });
                }
                Err(err) => {
                    let delay = self.delay(attempt);
                    tracing::warn!(
                        op,
                        attempt,
                        delay_secs = delay.as_secs(),
                        error = %err,
                        "retrying remote call"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// [`JobApi`] decorator applying a [`RetryPolicy`] to every call.
#[derive(Clone)]
pub struct Retrying<A> {
    inner: A,
    policy: RetryPolicy,
}

impl<A: JobApi> Retrying<A> {
    pub fn new(inner: A, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<A: JobApi> JobApi for Retrying<A> {
    async fn featured_workspaces(&self) -> Result<Vec<WorkspaceRef>, ApiError> {
        self.policy.run("featured_workspaces", || self.inner.featured_workspaces()).await
    }

    async fn get_workspace(&self, ws: &WorkspaceRef) -> Result<WorkspaceDetails, ApiError> {
        self.policy.run("get_workspace", || self.inner.get_workspace(ws)).await
    }

    async fn clone_workspace(
        &self,
        origin: &WorkspaceRef,
        clone: &WorkspaceRef,
        options: &CloneOptions,
    ) -> Result<(), ApiError> {
        self.policy
            .run("clone_workspace", || self.inner.clone_workspace(origin, clone, options))
            .await
    }

    async fn share_workspace(&self, ws: &WorkspaceRef, emails: &[String]) -> Result<(), ApiError> {
        self.policy.run("share_workspace", || self.inner.share_workspace(ws, emails)).await
    }

    async fn list_workspaces(&self, project: &str) -> Result<Vec<WorkspaceRef>, ApiError> {
        self.policy.run("list_workspaces", || self.inner.list_workspaces(project)).await
    }

    async fn delete_workspace(&self, ws: &WorkspaceRef) -> Result<(), ApiError> {
        self.policy.run("delete_workspace", || self.inner.delete_workspace(ws)).await
    }

    async fn list_method_configs(&self, ws: &WorkspaceRef) -> Result<Vec<MethodConfig>, ApiError> {
        self.policy.run("list_method_configs", || self.inner.list_method_configs(ws)).await
    }

    async fn list_entities(
        &self,
        ws: &WorkspaceRef,
        entity_type: &str,
    ) -> Result<Vec<EntityRef>, ApiError> {
        self.policy.run("list_entities", || self.inner.list_entities(ws, entity_type)).await
    }

    async fn create_submission(
        &self,
        ws: &WorkspaceRef,
        request: &CreateSubmission,
    ) -> Result<CreateOutcome, ApiError> {
        self.policy.run("create_submission", || self.inner.create_submission(ws, request)).await
    }

    async fn list_submissions(&self, ws: &WorkspaceRef) -> Result<Vec<SubmissionId>, ApiError> {
        self.policy.run("list_submissions", || self.inner.list_submissions(ws)).await
    }

    async fn get_submission(
        &self,
        ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<RemoteSubmission, ApiError> {
        self.policy.run("get_submission", || self.inner.get_submission(ws, id)).await
    }

    async fn get_workflow_metadata(
        &self,
        ws: &WorkspaceRef,
        submission: &SubmissionId,
        workflow: &WorkflowId,
    ) -> Result<WorkflowMetadata, ApiError> {
        self.policy
            .run("get_workflow_metadata", || {
                self.inner.get_workflow_metadata(ws, submission, workflow)
            })
            .await
    }

    async fn abort_submission(
        &self,
        ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<AbortOutcome, ApiError> {
        self.policy.run("abort_submission", || self.inner.abort_submission(ws, id)).await
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
