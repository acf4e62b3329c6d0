// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace references and clone naming.
//!
//! A clone is named after its origin with a timestamp suffix, so clones left
//! behind by earlier runs can be recognized and aged out later.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp suffix appended to clone names.
pub const CLONE_TIME_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// A workspace on the platform, addressed by billing project and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkspaceRef {
    #[serde(rename = "namespace")]
    pub project: String,
    pub name: String,
}

impl WorkspaceRef {
    pub fn new(project: impl Into<String>, name: impl Into<String>) -> Self {
        Self { project: project.into(), name: name.into() }
    }

    /// `project/name`, the form used in skip lists and logs.
    pub fn key(&self) -> String {
        format!("{}/{}", self.project, self.name)
    }

    /// Name of a clone of this workspace taken at `at`.
    pub fn clone_name(&self, at: DateTime<Utc>) -> String {
        format!("{}_{}", self.name, at.format(CLONE_TIME_FORMAT))
    }

    /// Report file name: spaces replaced so the name is URL-safe.
    pub fn report_file_name(&self) -> String {
        format!("{}.html", self.name.replace(' ', "_"))
    }

    pub fn job_history_link(&self) -> String {
        crate::links::job_history(&self.project, &self.name, None)
    }
}

impl fmt::Display for WorkspaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.name)
    }
}

/// Parse the clone timestamp out of a workspace name.
///
/// Returns `None` for names that were not produced by [`WorkspaceRef::clone_name`].
pub fn clone_timestamp(name: &str) -> Option<NaiveDateTime> {
    let (_, suffix) = name.rsplit_once('_')?;
    NaiveDateTime::parse_from_str(suffix, CLONE_TIME_FORMAT).ok()
}

/// A featured workspace and the clone made of it for one test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClonedWorkspace {
    pub origin: WorkspaceRef,
    pub clone: WorkspaceRef,
    /// Owners of the origin; they are notified on failure
    pub owners: Vec<String>,
    pub cloned_at: DateTime<Utc>,
}

impl ClonedWorkspace {
    pub fn new(origin: WorkspaceRef, clone_project: impl Into<String>, cloned_at: DateTime<Utc>) -> Self {
        let clone = WorkspaceRef::new(clone_project, origin.clone_name(cloned_at));
        Self { origin, clone, owners: Vec::new(), cloned_at }
    }

    crate::setters! {
        set { owners: Vec<String> }
    }
}

#[cfg(test)]
#[path = "workspace_tests.rs"]
mod tests;
