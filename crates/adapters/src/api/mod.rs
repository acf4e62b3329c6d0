// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote job API: workspaces, method configurations, and submissions.
//!
//! Response codes that carry defined meaning for a call (a rejected create, an
//! abort of a submission that no longer exists) come back as data. Any other
//! unexpected code is an [`ApiError::Status`].

mod http;

pub use http::{
    classify, rejection_message, Classified, HttpJobApi, DEFAULT_API_URL, FEATURED_LIST_URL,
    UNKNOWN_FAILURE,
};

use crate::auth::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fwt_core::{SubmissionId, SubmissionTarget, WorkflowId, WorkspaceRef};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from remote API calls
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{method} {path} returned {status}: {body}")]
    Status { method: &'static str, path: String, status: u16, body: String },
    #[error("could not parse response from {path}: {message}")]
    Parse { path: String, message: String },
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: usize, last: Box<ApiError> },
    #[error("{0}")]
    Auth(String),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Auth(err.to_string())
    }
}

impl ApiError {
    /// Transport failures and server errors are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            ApiError::Parse { .. } | ApiError::Exhausted { .. } | ApiError::Auth(_) => false,
        }
    }
}

/// A method configuration in a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodConfig {
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub root_entity_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub name: String,
}

/// Body of a create-submission call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmission {
    pub method_configuration_namespace: String,
    pub method_configuration_name: String,
    pub entity_type: Option<String>,
    pub entity_name: Option<String>,
    pub expression: Option<String>,
    pub use_call_cache: bool,
    pub delete_intermediate_output_files: bool,
}

impl CreateSubmission {
    pub fn new(target: &SubmissionTarget, call_cache: bool) -> Self {
        Self {
            method_configuration_namespace: target.method_project.clone(),
            method_configuration_name: target.workflow_name.clone(),
            entity_type: target.entity_type.clone(),
            entity_name: target.entity_name.clone(),
            expression: target.expression.clone(),
            use_call_cache: call_cache,
            delete_intermediate_output_files: false,
        }
    }
}

/// Result of a create-submission call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Accepted(SubmissionId),
    /// 400 or 404; `message` is taken from the response body
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortOutcome {
    Requested,
    /// The submission no longer exists remotely
    NotFound,
}

/// A submission as the remote API reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteSubmission {
    pub status: String,
    #[serde(default)]
    pub workflows: Vec<RemoteWorkflow>,
    #[serde(default)]
    pub cost: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteWorkflow {
    pub status: String,
    #[serde(default)]
    pub workflow_id: Option<WorkflowId>,
    #[serde(default)]
    pub messages: Vec<String>,
}

/// Workflow metadata, fetched without call and input detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowMetadata {
    pub status: String,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub failures: Vec<WorkflowFailure>,
}

impl WorkflowMetadata {
    /// Every nested cause message, concatenated in order.
    pub fn failure_messages(&self) -> String {
        self.failures
            .iter()
            .flat_map(|f| f.caused_by.iter())
            .map(|c| c.message.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowFailure {
    #[serde(rename = "causedBy", default)]
    pub caused_by: Vec<FailureCause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCause {
    #[serde(default)]
    pub message: String,
}

/// Workspace details needed to clone and attribute it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceDetails {
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub workspace: WorkspaceInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceInfo {
    #[serde(default)]
    pub cloud_platform: Option<String>,
    #[serde(default)]
    pub bucket_name: Option<String>,
}

impl WorkspaceDetails {
    pub fn is_azure(&self) -> bool {
        self.workspace.cloud_platform.as_deref() == Some("Azure")
    }
}

/// Options for a clone call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneOptions {
    pub bucket_location: Option<String>,
}

/// Adapter for the remote workspace and job API
#[async_trait]
pub trait JobApi: Clone + Send + Sync + 'static {
    /// Published list of featured workspaces
    async fn featured_workspaces(&self) -> Result<Vec<WorkspaceRef>, ApiError>;

    async fn get_workspace(&self, ws: &WorkspaceRef) -> Result<WorkspaceDetails, ApiError>;

    async fn clone_workspace(
        &self,
        origin: &WorkspaceRef,
        clone: &WorkspaceRef,
        options: &CloneOptions,
    ) -> Result<(), ApiError>;

    /// Grant read access (with share, without compute) to each address
    async fn share_workspace(&self, ws: &WorkspaceRef, emails: &[String]) -> Result<(), ApiError>;

    /// Workspaces in one billing project
    async fn list_workspaces(&self, project: &str) -> Result<Vec<WorkspaceRef>, ApiError>;

    async fn delete_workspace(&self, ws: &WorkspaceRef) -> Result<(), ApiError>;

    async fn list_method_configs(&self, ws: &WorkspaceRef) -> Result<Vec<MethodConfig>, ApiError>;

    async fn list_entities(
        &self,
        ws: &WorkspaceRef,
        entity_type: &str,
    ) -> Result<Vec<EntityRef>, ApiError>;

    async fn create_submission(
        &self,
        ws: &WorkspaceRef,
        request: &CreateSubmission,
    ) -> Result<CreateOutcome, ApiError>;

    /// Every submission ever made in `ws`, oldest first
    async fn list_submissions(&self, ws: &WorkspaceRef) -> Result<Vec<SubmissionId>, ApiError>;

    async fn get_submission(
        &self,
        ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<RemoteSubmission, ApiError>;

    async fn get_workflow_metadata(
        &self,
        ws: &WorkspaceRef,
        submission: &SubmissionId,
        workflow: &WorkflowId,
    ) -> Result<WorkflowMetadata, ApiError>;

    async fn abort_submission(
        &self,
        ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<AbortOutcome, ApiError>;
}

#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{remote_submission, ApiCall, FakeJobApi};

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
