// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted in-memory [`JobApi`] for tests.

use super::{
    AbortOutcome, ApiError, CloneOptions, CreateOutcome, CreateSubmission, EntityRef, JobApi,
    MethodConfig, RemoteSubmission, RemoteWorkflow, WorkflowMetadata, WorkspaceDetails,
};
use async_trait::async_trait;
use fwt_core::{SubmissionId, WorkflowId, WorkspaceRef};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Recorded API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FeaturedWorkspaces,
    GetWorkspace(String),
    CloneWorkspace { origin: String, clone: String },
    ShareWorkspace { workspace: String, emails: Vec<String> },
    ListWorkspaces(String),
    DeleteWorkspace(String),
    ListMethodConfigs(String),
    ListEntities { workspace: String, entity_type: String },
    CreateSubmission { workspace: String, request: CreateSubmission },
    ListSubmissions(String),
    GetSubmission(SubmissionId),
    GetWorkflowMetadata { submission: SubmissionId, workflow: WorkflowId },
    AbortSubmission(SubmissionId),
}

#[derive(Default)]
struct FakeApiState {
    calls: Vec<ApiCall>,
    featured: Vec<WorkspaceRef>,
    workspaces: HashMap<String, WorkspaceDetails>,
    existing: Vec<WorkspaceRef>,
    method_configs: HashMap<String, Vec<MethodConfig>>,
    entities: HashMap<(String, String), Vec<EntityRef>>,
    rejections: HashMap<String, (u16, String)>,
    submissions: HashMap<SubmissionId, VecDeque<RemoteSubmission>>,
    history: HashMap<String, Vec<SubmissionId>>,
    metadata: HashMap<WorkflowId, WorkflowMetadata>,
    abort_not_found: HashSet<SubmissionId>,
    failures: HashMap<&'static str, VecDeque<ApiError>>,
}

impl FakeApiState {
    fn take_failure(&mut self, op: &'static str) -> Result<(), ApiError> {
        match self.failures.get_mut(op).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn not_found(path: String) -> ApiError {
    ApiError::Status { method: "GET", path, status: 404, body: String::new() }
}

/// Fake job API for testing.
///
/// Accepted submissions get the id `sub-<workflow name>`. Scripted submission
/// states are returned one per poll; the last state repeats.
#[derive(Clone, Default)]
pub struct FakeJobApi {
    inner: Arc<Mutex<FakeApiState>>,
}

impl FakeJobApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submission id the fake assigns when `workflow` is accepted.
    pub fn submission_id_for(workflow: &str) -> SubmissionId {
        SubmissionId::new(format!("sub-{}", workflow))
    }

    pub fn set_featured(&self, featured: Vec<WorkspaceRef>) {
        self.inner.lock().featured = featured;
    }

    pub fn set_workspace(&self, ws: &WorkspaceRef, details: WorkspaceDetails) {
        self.inner.lock().workspaces.insert(ws.key(), details);
    }

    /// Workspaces already present in the clone project.
    pub fn set_existing(&self, existing: Vec<WorkspaceRef>) {
        self.inner.lock().existing = existing;
    }

    pub fn set_method_configs(&self, ws: &WorkspaceRef, configs: Vec<MethodConfig>) {
        self.inner.lock().method_configs.insert(ws.key(), configs);
    }

    pub fn set_entities(&self, ws: &WorkspaceRef, entity_type: &str, names: &[&str]) {
        let entities = names.iter().map(|n| EntityRef { name: n.to_string() }).collect();
        self.inner.lock().entities.insert((ws.key(), entity_type.to_string()), entities);
    }

    /// Reject the create call for `workflow` with `status` and a JSON message body.
    pub fn reject_create(&self, workflow: &str, status: u16, message: &str) {
        self.inner.lock().rejections.insert(workflow.to_string(), (status, message.to_string()));
    }

    /// Script the states returned by successive polls of `workflow`'s submission.
    pub fn script_submission(&self, workflow: &str, states: Vec<RemoteSubmission>) {
        self.inner.lock().submissions.insert(Self::submission_id_for(workflow), states.into());
    }

    /// Submissions listed for `ws`, one per workflow name.
    pub fn set_history(&self, ws: &WorkspaceRef, workflows: &[&str]) {
        let ids = workflows.iter().map(|w| Self::submission_id_for(w)).collect();
        self.inner.lock().history.insert(ws.key(), ids);
    }

    pub fn set_metadata(&self, workflow_id: &str, metadata: WorkflowMetadata) {
        self.inner.lock().metadata.insert(WorkflowId::new(workflow_id), metadata);
    }

    pub fn abort_not_found(&self, workflow: &str) {
        self.inner.lock().abort_not_found.insert(Self::submission_id_for(workflow));
    }

    /// Fail the next call of `op` (a [`JobApi`] method name) with `err`.
    pub fn fail_next(&self, op: &'static str, err: ApiError) {
        self.inner.lock().failures.entry(op).or_default().push_back(err);
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().calls.clone()
    }

    /// Workflow names passed to create calls, in call order.
    pub fn created(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::CreateSubmission { request, .. } => Some(request.method_configuration_name),
                _ => None,
            })
            .collect()
    }

    pub fn aborted(&self) -> Vec<SubmissionId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::AbortSubmission(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                ApiCall::DeleteWorkspace(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls touching `id` after it was created.
    pub fn calls_for(&self, id: &SubmissionId) -> usize {
        self.calls()
            .iter()
            .filter(|c| match c {
                ApiCall::GetSubmission(s) | ApiCall::AbortSubmission(s) => s == id,
                ApiCall::GetWorkflowMetadata { submission, .. } => submission == id,
                _ => false,
            })
            .count()
    }
}

/// Remote submission state with one workflow entry.
pub fn remote_submission(
    status: &str,
    workflow_status: &str,
    workflow_id: Option<&str>,
) -> RemoteSubmission {
    RemoteSubmission {
        status: status.to_string(),
        workflows: vec![RemoteWorkflow {
            status: workflow_status.to_string(),
            workflow_id: workflow_id.map(WorkflowId::new),
            messages: Vec::new(),
        }],
        cost: None,
    }
}

#[async_trait]
impl JobApi for FakeJobApi {
    async fn featured_workspaces(&self) -> Result<Vec<WorkspaceRef>, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::FeaturedWorkspaces);
        state.take_failure("featured_workspaces")?;
        Ok(state.featured.clone())
    }

    async fn get_workspace(&self, ws: &WorkspaceRef) -> Result<WorkspaceDetails, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::GetWorkspace(ws.key()));
        state.take_failure("get_workspace")?;
        Ok(state.workspaces.get(&ws.key()).cloned().unwrap_or_default())
    }

    async fn clone_workspace(
        &self,
        origin: &WorkspaceRef,
        clone: &WorkspaceRef,
        _options: &CloneOptions,
    ) -> Result<(), ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::CloneWorkspace { origin: origin.key(), clone: clone.key() });
        state.take_failure("clone_workspace")?;
        state.existing.push(clone.clone());
        Ok(())
    }

    async fn share_workspace(&self, ws: &WorkspaceRef, emails: &[String]) -> Result<(), ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::ShareWorkspace { workspace: ws.key(), emails: emails.to_vec() });
        state.take_failure("share_workspace")
    }

    async fn list_workspaces(&self, project: &str) -> Result<Vec<WorkspaceRef>, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::ListWorkspaces(project.to_string()));
        state.take_failure("list_workspaces")?;
        Ok(state.existing.iter().filter(|ws| ws.project == project).cloned().collect())
    }

    async fn delete_workspace(&self, ws: &WorkspaceRef) -> Result<(), ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::DeleteWorkspace(ws.key()));
        state.take_failure("delete_workspace")?;
        state.existing.retain(|w| w != ws);
        Ok(())
    }

    async fn list_method_configs(&self, ws: &WorkspaceRef) -> Result<Vec<MethodConfig>, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::ListMethodConfigs(ws.key()));
        state.take_failure("list_method_configs")?;
        Ok(state.method_configs.get(&ws.key()).cloned().unwrap_or_default())
    }

    async fn list_entities(
        &self,
        ws: &WorkspaceRef,
        entity_type: &str,
    ) -> Result<Vec<EntityRef>, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::ListEntities {
            workspace: ws.key(),
            entity_type: entity_type.to_string(),
        });
        state.take_failure("list_entities")?;
        let key = (ws.key(), entity_type.to_string());
        Ok(state.entities.get(&key).cloned().unwrap_or_default())
    }

    async fn create_submission(
        &self,
        ws: &WorkspaceRef,
        request: &CreateSubmission,
    ) -> Result<CreateOutcome, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::CreateSubmission { workspace: ws.key(), request: request.clone() });
        state.take_failure("create_submission")?;
        let workflow = &request.method_configuration_name;
        if let Some((status, message)) = state.rejections.get(workflow) {
            return Ok(CreateOutcome::Rejected { status: *status, message: message.clone() });
        }
        Ok(CreateOutcome::Accepted(Self::submission_id_for(workflow)))
    }

    async fn list_submissions(&self, ws: &WorkspaceRef) -> Result<Vec<SubmissionId>, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::ListSubmissions(ws.key()));
        state.take_failure("list_submissions")?;
        Ok(state.history.get(&ws.key()).cloned().unwrap_or_default())
    }

    async fn get_submission(
        &self,
        _ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<RemoteSubmission, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::GetSubmission(id.clone()));
        state.take_failure("get_submission")?;
        let states =
            state.submissions.get_mut(id).ok_or_else(|| not_found(format!("submissions/{}", id)))?;
        let current = if states.len() > 1 { states.pop_front() } else { states.front().cloned() };
        current.ok_or_else(|| not_found(format!("submissions/{}", id)))
    }

    async fn get_workflow_metadata(
        &self,
        _ws: &WorkspaceRef,
        submission: &SubmissionId,
        workflow: &WorkflowId,
    ) -> Result<WorkflowMetadata, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::GetWorkflowMetadata {
            submission: submission.clone(),
            workflow: workflow.clone(),
        });
        state.take_failure("get_workflow_metadata")?;
        state
            .metadata
            .get(workflow)
            .cloned()
            .ok_or_else(|| not_found(format!("submissions/{}/workflows/{}", submission, workflow)))
    }

    async fn abort_submission(
        &self,
        _ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<AbortOutcome, ApiError> {
        let mut state = self.inner.lock();
        state.calls.push(ApiCall::AbortSubmission(id.clone()));
        state.take_failure("abort_submission")?;
        if state.abort_not_found.contains(id) {
            Ok(AbortOutcome::NotFound)
        } else {
            Ok(AbortOutcome::Requested)
        }
    }
}
