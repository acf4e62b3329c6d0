// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace test session: the batches of submissions for one cloned workspace.
//!
//! Submissions live in an arena owned by the session; batches and the
//! completed list hold indices into it. Batches run in order and each batch is
//! removed only once every submission in it is terminal.

use crate::batching::{build_submission, plan_batches};
use crate::submission;
use fwt_adapters::{ApiError, JobApi};
use fwt_core::{
    Clock, ClonedWorkspace, Elapsed, SessionStatus, Submission, SubmissionError, TrackingStatus,
    WorkspaceRef,
};
use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that stop a session.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

pub struct WorkspaceSession<C: Clock> {
    workspace: ClonedWorkspace,
    call_cache: bool,
    abort_after: Option<Duration>,
    clock: C,
    started: Instant,
    stopped: Option<Instant>,
    submissions: Vec<Submission>,
    batches: VecDeque<Vec<usize>>,
    completed: Vec<usize>,
    abort_requested: HashSet<usize>,
    total_cost: Option<f64>,
    report_url: Option<String>,
}

impl<C: Clock> WorkspaceSession<C> {
    /// Start a session for a freshly cloned workspace. The abort timer starts now.
    pub fn new(workspace: ClonedWorkspace, call_cache: bool, clock: C) -> Self {
        let started = clock.now();
        Self {
            workspace,
            call_cache,
            abort_after: None,
            clock,
            started,
            stopped: None,
            submissions: Vec::new(),
            batches: VecDeque::new(),
            completed: Vec::new(),
            abort_requested: HashSet::new(),
            total_cost: None,
            report_url: None,
        }
    }

    /// Abort submissions still running once the session is older than `limit`.
    pub fn abort_after(mut self, limit: Duration) -> Self {
        self.abort_after = Some(limit);
        self
    }

    pub fn workspace(&self) -> &ClonedWorkspace {
        &self.workspace
    }

    pub fn clone_ref(&self) -> &WorkspaceRef {
        &self.workspace.clone
    }

    pub fn call_cache(&self) -> bool {
        self.call_cache
    }

    /// Every planned submission, in listing order.
    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    /// Submissions that reached a final status, in completion order.
    pub fn completed(&self) -> impl Iterator<Item = &Submission> {
        self.completed.iter().filter_map(|i| self.submissions.get(*i))
    }

    pub fn is_drained(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn total_cost(&self) -> Option<f64> {
        self.total_cost
    }

    pub fn report_url(&self) -> Option<&str> {
        self.report_url.as_deref()
    }

    pub fn set_report_url(&mut self, url: impl Into<String>) {
        self.report_url = Some(url.into());
    }

    /// Failure iff any completed submission neither succeeded nor was skipped.
    pub fn status(&self) -> SessionStatus {
        SessionStatus::from_outcomes(self.completed().map(Submission::final_status))
    }

    /// Time since the session started, up to when it was stopped.
    pub fn elapsed(&self) -> Elapsed {
        let end = self.stopped.unwrap_or_else(|| self.clock.now());
        Elapsed::with_default_threshold(end.saturating_duration_since(self.started))
    }

    /// Stop the session timer. Later calls keep the first stop time.
    pub fn stop(&mut self) {
        if self.stopped.is_none() {
            self.stopped = Some(self.clock.now());
        }
    }

    fn over_limit(&self) -> bool {
        self.abort_after
            .is_some_and(|limit| self.clock.now().saturating_duration_since(self.started) > limit)
    }

    /// List the clone's method configurations and plan the batches.
    pub async fn enumerate<A: JobApi>(&mut self, api: &A) -> Result<(), SessionError> {
        let ws = self.workspace.clone.clone();
        let configs = api.list_method_configs(&ws).await?;
        let mut submissions = Vec::with_capacity(configs.len());
        for config in &configs {
            submissions.push(build_submission(api, &ws, config).await?);
        }
        let names: Vec<&str> = submissions.iter().map(Submission::workflow_name).collect();
        let batches = plan_batches(&names);
        tracing::info!(
            workspace = %ws,
            workflows = submissions.len(),
            sequential = batches.len() > 1,
            "submissions planned"
        );
        self.batches = batches.into();
        self.submissions = submissions;
        Ok(())
    }

    /// Advance the head batch by one polling cycle.
    ///
    /// Creates unsubmitted submissions, polls pending ones, finalizes newly
    /// terminal ones and, past the abort limit, aborts the rest. When the head
    /// batch is fully terminal it is removed and the next batch is started in
    /// the same call. Calling this on a drained session does nothing.
    pub async fn drive<A: JobApi>(&mut self, api: &A) -> Result<(), SessionError> {
        let ws = self.workspace.clone.clone();
        let abort = self.over_limit();
        for _ in 0..self.batches.len() {
            let Some(batch) = self.batches.front().cloned() else {
                break;
            };
            let mut done = 0;
            for &i in &batch {
                let Some(sub) = self.submissions.get_mut(i) else {
                    continue;
                };
                let mut just_created = false;
                if sub.status() == &TrackingStatus::Unsubmitted {
                    submission::create(api, sub, self.call_cache).await?;
                    just_created = true;
                }
                if sub.status().is_pending() {
                    submission::poll(api, sub).await?;
                }
                if sub.is_terminal() {
                    done += 1;
                    if !self.completed.contains(&i) {
                        if !sub.is_finalized() {
                            submission::finalize(api, sub).await?;
                        }
                        self.completed.push(i);
                    }
                } else if abort && !just_created && self.abort_requested.insert(i) {
                    submission::abort(api, sub).await?;
                }
            }
            tracing::info!(
                workspace = %ws,
                finished = done,
                total = batch.len(),
                "batch progress"
            );
            if done < batch.len() {
                break;
            }
            self.batches.pop_front();
        }
        Ok(())
    }

    /// Fetch and total the cost of every completed submission.
    ///
    /// Costs that cannot be fetched are logged and left out of the total.
    pub async fn fetch_costs<A: JobApi>(&mut self, api: &A) -> f64 {
        let mut total = 0.0;
        for &i in &self.completed {
            let Some(sub) = self.submissions.get_mut(i) else {
                continue;
            };
            match submission::fetch_cost(api, sub).await {
                Ok(Some(cost)) => total += cost,
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    workspace = %self.workspace.clone,
                    workflow = sub.workflow_name(),
                    error = %e,
                    "cost unavailable"
                ),
            }
        }
        self.total_cost = Some(total);
        total
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
