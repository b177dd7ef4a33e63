//! Contract Test: Reconciler branching
//!
//! Constraints verified:
//! - Absent record → exactly one create, no replace
//! - Present record → exactly one replace, no create
//! - Any other lookup error → returned as-is, no writes
//! - Write failures → returned as-is, no fallback to the other write
//!
//! If this test fails, the upsert decision is broken.

mod common;

use clouddns_core::{reconcile, Action, Error, Reconciler, Record};
use common::*;

#[tokio::test]
async fn absent_record_is_created_once() {
    let recorder = ScriptedRecorder::new(LookupScript::NotFound);
    let desired = api_record("10.10.10.10");

    let result = reconcile(&recorder, desired.clone()).await.unwrap();

    assert_eq!(result, desired);
    assert_eq!(recorder.created(), vec![desired]);
    assert!(recorder.replaced().is_empty(), "replace must not be called");
    assert_eq!(recorder.total_calls(), 2);
}

#[tokio::test]
async fn present_record_is_replaced_once() {
    let recorder = ScriptedRecorder::new(LookupScript::Found(api_record("10.10.10.11")));
    let desired = api_record("10.10.10.10");

    let outcome = Reconciler::new(&recorder).reconcile(desired.clone()).await.unwrap();

    assert_eq!(outcome.action, Action::Replaced);
    assert_eq!(outcome.record.data, vec!["10.10.10.10".to_string()]);
    assert_eq!(recorder.replaced(), vec![desired]);
    assert!(recorder.created().is_empty(), "create must not be called");
}

#[tokio::test]
async fn lookup_is_keyed_by_desired_key_and_type() {
    let recorder = ScriptedRecorder::new(LookupScript::NotFound);
    let desired = Record::new(
        "_acme-challenge.w.uname.link.",
        "TXT",
        vec!["\"token\"".to_string()],
        120,
    );

    reconcile(&recorder, desired).await.unwrap();

    assert_eq!(
        recorder.lookup_calls(),
        vec![("_acme-challenge.w.uname.link.".to_string(), "TXT".to_string())]
    );
}

#[tokio::test]
async fn lookup_error_is_returned_without_writes() {
    let recorder = ScriptedRecorder::new(LookupScript::Fail("permission denied".to_string()));

    let err = reconcile(&recorder, api_record("10.10.10.10")).await.unwrap_err();

    assert!(matches!(err, Error::Backend { .. }));
    assert!(err.to_string().contains("permission denied"));
    assert!(recorder.created().is_empty());
    assert!(recorder.replaced().is_empty());
    assert_eq!(recorder.total_calls(), 1, "only lookup may run");
}

#[tokio::test]
async fn create_failure_is_returned_without_replace() {
    let recorder = ScriptedRecorder::new(LookupScript::NotFound).failing_create("quota exceeded");

    let result = reconcile(&recorder, api_record("10.10.10.10")).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(recorder.created().len(), 1);
    assert!(recorder.replaced().is_empty(), "no fallback to replace");
}

#[tokio::test]
async fn replace_failure_is_returned_without_create() {
    let recorder = ScriptedRecorder::new(LookupScript::Found(api_record("10.10.10.11")))
        .failing_replace("conflict");

    let result = reconcile(&recorder, api_record("10.10.10.10")).await;

    assert!(result.is_err());
    assert_eq!(recorder.replaced().len(), 1);
    assert!(recorder.created().is_empty(), "no fallback to create");
}

#[tokio::test]
async fn invalid_record_makes_no_backend_calls() {
    let recorder = ScriptedRecorder::new(LookupScript::NotFound);
    let mut desired = api_record("10.10.10.10");
    desired.data.clear();

    let err = reconcile(&recorder, desired).await.unwrap_err();

    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(recorder.total_calls(), 0);
}
