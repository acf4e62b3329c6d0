// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fwt_adapters::{ApiCall, FakeJobApi};
use fwt_core::{FinalStatus, TrackingStatus};
use proptest::prelude::*;

#[yare::parameterized(
    test_wins          = { &["a", "b_small", "c_test"], Some("c_test") },
    last_test_wins     = { &["x_test", "y_test"], Some("y_test") },
    small_fallback     = { &["a", "b_small", "c_small"], Some("c_small") },
    first_fallback     = { &["first", "second"], Some("first") },
    test_beats_small   = { &["x_test", "y_small"], Some("x_test") },
    empty              = { &[], None },
)]
fn entity_choice(names: &[&str], expected: Option<&str>) {
    assert_eq!(pick_entity(names), expected);
}

#[yare::parameterized(
    numbered     = { &["1-align", "2-call"], true },
    zero_based   = { &["0_prep", "1_align", "2_call"], true },
    only_one     = { &["1-align", "call"], false },
    unnumbered   = { &["alignA", "alignB"], false },
    digits_later = { &["a1", "a2"], false },
    empty        = { &[], false },
)]
fn ordering_detection(names: &[&str], expected: bool) {
    assert_eq!(is_explicitly_ordered(names), expected);
}

#[test]
fn ordered_names_get_one_batch_each_sorted() {
    let names = ["2-call", "1-align", "3-annotate"];
    assert_eq!(plan_batches(&names), vec![vec![1], vec![0], vec![2]]);
}

#[test]
fn unordered_names_share_one_batch_in_listing_order() {
    let names = ["alignB", "alignA", "callC"];
    assert_eq!(plan_batches(&names), vec![vec![0, 1, 2]]);
}

#[test]
fn no_names_no_batches() {
    let names: [&str; 0] = [];
    assert!(plan_batches(&names).is_empty());
}

proptest! {
    #[test]
    fn every_workflow_lands_in_exactly_one_batch(names in prop::collection::vec("[0-9a-z_]{1,8}", 0..8)) {
        let mut seen: Vec<usize> = plan_batches(&names).into_iter().flatten().collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..names.len()).collect::<Vec<_>>());
    }
}

fn config(name: &str, root: Option<&str>) -> MethodConfig {
    MethodConfig {
        name: name.to_string(),
        namespace: "methods".to_string(),
        root_entity_type: root.map(str::to_string),
    }
}

fn ws() -> WorkspaceRef {
    WorkspaceRef::new("featured-workspace-testing", "Intro_2026-03-14-09-26-53")
}

#[tokio::test]
async fn single_entity_workflow_uses_representative_entity() {
    let api = FakeJobApi::new();
    api.set_entities(&ws(), "sample", &["NA12878", "NA12878_small"]);

    let sub = build_submission(&api, &ws(), &config("align", Some("sample"))).await.unwrap();

    let target = sub.target();
    assert_eq!(target.entity_name.as_deref(), Some("NA12878_small"));
    assert_eq!(target.entity_type.as_deref(), Some("sample"));
    assert_eq!(target.expression, None);
    assert_eq!(target.method_project, "methods");
    assert_eq!(sub.status(), &TrackingStatus::Unsubmitted);
}

#[tokio::test]
async fn set_type_workflow_runs_over_entity_set() {
    let api = FakeJobApi::new();
    api.set_entities(&ws(), "sample_set", &["all_samples"]);
    let name = SET_TYPE_WORKFLOWS[1];

    let sub = build_submission(&api, &ws(), &config(name, Some("sample"))).await.unwrap();

    let target = sub.target();
    assert_eq!(target.entity_type.as_deref(), Some("sample_set"));
    assert_eq!(target.entity_name.as_deref(), Some("all_samples"));
    assert_eq!(target.expression.as_deref(), Some("this.samples"));
}

#[tokio::test]
async fn no_entities_clears_entity_type() {
    let api = FakeJobApi::new();

    let sub = build_submission(&api, &ws(), &config("align", Some("sample"))).await.unwrap();

    assert_eq!(sub.target().entity_name, None);
    assert_eq!(sub.target().entity_type, None);
}

#[tokio::test]
async fn set_type_workflow_without_entities_keeps_expression() {
    let api = FakeJobApi::new();
    let name = SET_TYPE_WORKFLOWS[0];

    let sub = build_submission(&api, &ws(), &config(name, Some("sample"))).await.unwrap();

    let target = sub.target();
    assert_eq!(target.entity_name, None);
    assert_eq!(target.entity_type, None);
    assert_eq!(target.expression.as_deref(), Some("this.samples"));
}

#[tokio::test]
async fn workflow_without_root_type_skips_entity_lookup() {
    let api = FakeJobApi::new();

    build_submission(&api, &ws(), &config("hello", None)).await.unwrap();

    assert!(!api.calls().iter().any(|c| matches!(c, ApiCall::ListEntities { .. })));
}

#[yare::parameterized(
    lower = { "optional-qc" },
    mixed = { "3-Optional_Annotate" },
)]
#[test_macro(tokio::test)]
async fn optional_workflows_are_not_tested(name: &str) {
    let api = FakeJobApi::new();

    let sub = build_submission(&api, &ws(), &config(name, None)).await.unwrap();

    assert_eq!(sub.status(), &TrackingStatus::Done);
    assert_eq!(sub.final_status(), Some(&FinalStatus::NotTested));
    assert_eq!(sub.error(), Some(OPTIONAL_NOTE));
}
