// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn submission_id_display() {
    let id = SubmissionId::new("3f2a9c1e-aaaa-bbbb-cccc-0123456789ab");
    assert_eq!(id.to_string(), "3f2a9c1e-aaaa-bbbb-cccc-0123456789ab");
}

#[test]
fn workflow_id_equality() {
    let id1 = WorkflowId::new("wf-1");
    let id2 = WorkflowId::from("wf-1");
    let id3 = WorkflowId::new("wf-2");

    assert_eq!(id1, id2);
    assert_ne!(id1, id3);
    assert_eq!(id1, "wf-1");
}

#[test]
fn ids_deref_to_str() {
    let id = SubmissionId::new("sub-7");
    assert!(id.starts_with("sub-"));
    assert_eq!(id.as_str(), "sub-7");
}

#[test]
fn ids_serialize_transparently() {
    let id = SubmissionId::new("sub-1");
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"sub-1\"");

    let parsed: SubmissionId = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, id);
}
