// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Turning a workspace's method configurations into ordered submission batches.

use crate::session::SessionError;
use fwt_adapters::{JobApi, MethodConfig};
use fwt_core::{Submission, SubmissionTarget, WorkspaceRef};

/// Workflows that run over a set of entities rather than a single entity.
pub const SET_TYPE_WORKFLOWS: &[&str] =
    &["0_idap_pre_processing_for_analysis", "1_processing-for-variant-discovery-gatk4"];

/// Note recorded on workflows skipped because they are optional.
pub const OPTIONAL_NOTE: &str = "Optional workflow not tested";

/// Choose the representative entity: the last one containing `_test`, else the
/// last containing `_small`, else the first.
pub fn pick_entity<S: AsRef<str>>(names: &[S]) -> Option<&str> {
    let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
    names
        .iter()
        .rev()
        .find(|n| n.contains("_test"))
        .or_else(|| names.iter().rev().find(|n| n.contains("_small")))
        .or_else(|| names.first())
        .copied()
}

/// Workflows are run in order when their names are numbered, which is
/// detected as leading characters including both `1` and `2`.
pub fn is_explicitly_ordered<S: AsRef<str>>(names: &[S]) -> bool {
    let firsts: Vec<char> = names.iter().filter_map(|n| n.as_ref().chars().next()).collect();
    firsts.contains(&'1') && firsts.contains(&'2')
}

/// Group workflow indices into batches.
///
/// Ordered workflows each get their own batch, sorted by name. Otherwise all
/// workflows share one batch in listing order.
pub fn plan_batches<S: AsRef<str>>(names: &[S]) -> Vec<Vec<usize>> {
    if names.is_empty() {
        return Vec::new();
    }
    if is_explicitly_ordered(names) {
        let mut order: Vec<usize> = (0..names.len()).collect();
        order.sort_by(|a, b| names[*a].as_ref().cmp(names[*b].as_ref()));
        order.into_iter().map(|i| vec![i]).collect()
    } else {
        vec![(0..names.len()).collect()]
    }
}

fn is_optional(workflow: &str) -> bool {
    workflow.to_lowercase().contains("optional")
}

/// Build the submission for one method configuration in `ws`.
pub async fn build_submission<A: JobApi>(
    api: &A,
    ws: &WorkspaceRef,
    config: &MethodConfig,
) -> Result<Submission, SessionError> {
    let mut target = SubmissionTarget::new(&ws.project, &ws.name, &config.namespace, &config.name);

    if let Some(root_type) = &config.root_entity_type {
        let (entity_type, expression) = if SET_TYPE_WORKFLOWS.contains(&config.name.as_str()) {
            (format!("{}_set", root_type), Some(format!("this.{}s", root_type)))
        } else {
            (root_type.clone(), None)
        };
        let entities = api.list_entities(ws, &entity_type).await?;
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        // The expression is sent even when no entity was found
        target.expression = expression;
        if let Some(entity) = pick_entity(&names) {
            target.entity_name = Some(entity.to_string());
            target.entity_type = Some(entity_type);
        }
    }

    let mut sub = Submission::new(target);
    if is_optional(&config.name) {
        sub.skip_not_tested(OPTIONAL_NOTE)?;
    }
    tracing::debug!(
        workspace = %ws,
        workflow = %config.name,
        entity = sub.target().entity_name.as_deref().unwrap_or("-"),
        "submission planned"
    );
    Ok(sub)
}

#[cfg(test)]
#[path = "batching_tests.rs"]
mod tests;
