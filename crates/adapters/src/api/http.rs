// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP client for the remote workspace API.
//!
//! Every call declares the codes it expects. Success codes and "special" codes
//! (with defined meaning for that call) are handed back to the caller; anything
//! else becomes [`ApiError::Status`].

use super::{
    AbortOutcome, ApiError, CloneOptions, CreateOutcome, CreateSubmission, EntityRef, JobApi,
    MethodConfig, RemoteSubmission, WorkflowMetadata, WorkspaceDetails,
};
use crate::auth::TokenCache;
use async_trait::async_trait;
use fwt_core::{SubmissionId, WorkflowId, WorkspaceRef};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.firecloud.org/api/";
pub const FEATURED_LIST_URL: &str =
    "https://storage.googleapis.com/firecloud-alerts/featured-workspaces.json";

/// Message used when a rejection body carries no readable message.
pub const UNKNOWN_FAILURE: &str = "UNKNOWN FAILURE!";

/// How a response code relates to what the call declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified {
    Ok,
    Special,
    Unexpected,
}

pub fn classify(status: u16, ok: &[u16], special: &[u16]) -> Classified {
    if ok.contains(&status) {
        Classified::Ok
    } else if special.contains(&status) {
        Classified::Special
    } else {
        Classified::Unexpected
    }
}

/// Extract `message` from a JSON error body.
pub fn rejection_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        message: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| UNKNOWN_FAILURE.to_string())
}

struct Reply {
    status: u16,
    path: String,
    body: String,
}

impl Reply {
    fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body)
            .map_err(|e| ApiError::Parse { path: self.path.clone(), message: e.to_string() })
    }
}

fn workspace_path(ws: &WorkspaceRef, rest: &str) -> String {
    format!("workspaces/{}/{}{}", ws.project, ws.name, rest)
}

/// reqwest-backed [`JobApi`]
#[derive(Clone)]
pub struct HttpJobApi {
    client: reqwest::Client,
    base_url: String,
    tokens: TokenCache,
}

impl HttpJobApi {
    pub fn new(base_url: impl Into<String>, tokens: TokenCache) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("fwt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { client, base_url: base_url.into(), tokens })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send with the current access token. A 401 means the token went stale
    /// server-side: refresh it and resend once.
    async fn send(
        &self,
        method: &'static str,
        path: String,
        request: reqwest::RequestBuilder,
        ok: &[u16],
        special: &[u16],
    ) -> Result<Reply, ApiError> {
        let resend = request.try_clone();
        let token = self.tokens.token().await?;
        let result = self.execute(method, path.clone(), request.bearer_auth(token), ok, special).await;
        let rejected = matches!(result, Err(ApiError::Status { status: 401, .. }));
        match resend {
            Some(resend) if rejected => {
                tracing::info!(%path, "access token rejected, refreshing");
                let token = self.tokens.refresh().await?;
                self.execute(method, path, resend.bearer_auth(token), ok, special).await
            }
            _ => result,
        }
    }

    async fn execute(
        &self,
        method: &'static str,
        path: String,
        request: reqwest::RequestBuilder,
        ok: &[u16],
        special: &[u16],
    ) -> Result<Reply, ApiError> {
        tracing::debug!(method, %path, "api request");
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        match classify(status, ok, special) {
            Classified::Ok | Classified::Special => Ok(Reply { status, path, body }),
            Classified::Unexpected => Err(ApiError::Status { method, path, status, body }),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: String) -> Result<T, ApiError> {
        let request = self.request(reqwest::Method::GET, &path);
        self.send("GET", path, request, &[200], &[]).await?.json()
    }
}

#[async_trait]
impl JobApi for HttpJobApi {
    async fn featured_workspaces(&self) -> Result<Vec<WorkspaceRef>, ApiError> {
        // Public list, no token
        let path = FEATURED_LIST_URL.to_string();
        let request = self.client.get(&path);
        self.execute("GET", path, request, &[200], &[]).await?.json()
    }

    async fn get_workspace(&self, ws: &WorkspaceRef) -> Result<WorkspaceDetails, ApiError> {
        self.get(workspace_path(ws, "")).await
    }

    async fn clone_workspace(
        &self,
        origin: &WorkspaceRef,
        clone: &WorkspaceRef,
        options: &CloneOptions,
    ) -> Result<(), ApiError> {
        let path = workspace_path(origin, "/clone");
        let mut body = json!({
            "namespace": clone.project,
            "name": clone.name,
            "attributes": {},
            "authorizationDomain": [],
        });
        if let Some(location) = &options.bucket_location {
            body["bucketLocation"] = json!(location);
        }
        let request = self.request(reqwest::Method::POST, &path).json(&body);
        self.send("POST", path, request, &[201], &[]).await?;
        Ok(())
    }

    async fn share_workspace(&self, ws: &WorkspaceRef, emails: &[String]) -> Result<(), ApiError> {
        let path = workspace_path(ws, "/acl?inviteUsersNotFound=false");
        let body: Vec<_> = emails
            .iter()
            .map(|email| {
                json!({
                    "email": email,
                    "accessLevel": "READER",
                    "canShare": true,
                    "canCompute": false,
                })
            })
            .collect();
        let request = self.request(reqwest::Method::PATCH, &path).json(&body);
        self.send("PATCH", path, request, &[200], &[]).await?;
        Ok(())
    }

    async fn list_workspaces(&self, project: &str) -> Result<Vec<WorkspaceRef>, ApiError> {
        #[derive(Deserialize)]
        struct Listed {
            workspace: WorkspaceRef,
        }
        let listed: Vec<Listed> = self.get("workspaces".to_string()).await?;
        Ok(listed.into_iter().map(|l| l.workspace).filter(|ws| ws.project == project).collect())
    }

    async fn delete_workspace(&self, ws: &WorkspaceRef) -> Result<(), ApiError> {
        let path = workspace_path(ws, "");
        let request = self.request(reqwest::Method::DELETE, &path);
        self.send("DELETE", path, request, &[200, 202, 204], &[]).await?;
        Ok(())
    }

    async fn list_method_configs(&self, ws: &WorkspaceRef) -> Result<Vec<MethodConfig>, ApiError> {
        self.get(workspace_path(ws, "/methodconfigs?allRepos=true")).await
    }

    async fn list_entities(
        &self,
        ws: &WorkspaceRef,
        entity_type: &str,
    ) -> Result<Vec<EntityRef>, ApiError> {
        self.get(workspace_path(ws, &format!("/entities/{}", entity_type))).await
    }

    async fn create_submission(
        &self,
        ws: &WorkspaceRef,
        request: &CreateSubmission,
    ) -> Result<CreateOutcome, ApiError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Created {
            submission_id: SubmissionId,
        }
        let path = workspace_path(ws, "/submissions");
        let builder = self.request(reqwest::Method::POST, &path).json(request);
        let reply = self.send("POST", path, builder, &[201], &[400, 404]).await?;
        if reply.status == 201 {
            let created: Created = reply.json()?;
            Ok(CreateOutcome::Accepted(created.submission_id))
        } else {
            Ok(CreateOutcome::Rejected {
                status: reply.status,
                message: rejection_message(&reply.body),
            })
        }
    }

    async fn list_submissions(&self, ws: &WorkspaceRef) -> Result<Vec<SubmissionId>, ApiError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Listed {
            submission_id: SubmissionId,
        }
        let listed: Vec<Listed> = self.get(workspace_path(ws, "/submissions")).await?;
        Ok(listed.into_iter().map(|l| l.submission_id).collect())
    }

    async fn get_submission(
        &self,
        ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<RemoteSubmission, ApiError> {
        self.get(workspace_path(ws, &format!("/submissions/{}", id))).await
    }

    async fn get_workflow_metadata(
        &self,
        ws: &WorkspaceRef,
        submission: &SubmissionId,
        workflow: &WorkflowId,
    ) -> Result<WorkflowMetadata, ApiError> {
        let rest = format!(
            "/submissions/{}/workflows/{}?excludeKey=calls&excludeKey=inputs&expandSubWorkflows=false",
            submission, workflow
        );
        self.get(workspace_path(ws, &rest)).await
    }

    async fn abort_submission(
        &self,
        ws: &WorkspaceRef,
        id: &SubmissionId,
    ) -> Result<AbortOutcome, ApiError> {
        let path = workspace_path(ws, &format!("/submissions/{}", id));
        let request = self.request(reqwest::Method::DELETE, &path);
        let reply = self.send("DELETE", path, request, &[204], &[404]).await?;
        Ok(if reply.status == 404 { AbortOutcome::NotFound } else { AbortOutcome::Requested })
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
