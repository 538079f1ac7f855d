//! 収集・同期パイプライン全体のテスト

use std::sync::Arc;

use serde_json::json;

use super::{request, use_case, PASSWORD, USERNAME};
use crate::adapter::{FakePlatform, FakeStory, MemoryTable};
use crate::domain::{FailureKind, InvocationResponse};
use crate::ports::inbound::RunPipeline;

fn platform(stories: Vec<FakeStory>) -> Arc<FakePlatform> {
    Arc::new(FakePlatform::new(USERNAME, PASSWORD).with_stories(stories))
}

fn viewers_of(response: &InvocationResponse) -> Vec<String> {
    match response {
        InvocationResponse::Success { viewers, .. } => viewers.clone(),
        other => panic!("expected success, got {:?}", other),
    }
}

#[test]
fn test_zero_stories_yields_empty_viewers() {
    let dir = tempfile::tempdir().unwrap();
    let table = Arc::new(MemoryTable::new());
    let uc = use_case(&platform(vec![]), Some(&table));

    let response = uc.invoke(&request(dir.path(), PASSWORD, true));

    assert_eq!(response.status_code(), 200);
    assert!(viewers_of(&response).is_empty());
    assert_eq!(
        response.body(),
        json!({"viewers": [], "inserted": [], "already_present": [], "failed": []})
    );
    assert!(table.rows().is_empty());
}

#[test]
fn test_viewers_are_concatenated_in_story_order_with_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let stories = vec![
        FakeStory::new("s1", &[("alice", "Alice"), ("bob", "Bob")]),
        FakeStory::new("s2", &[]),
        FakeStory::new("s3", &[("carol", "Carol"), ("alice", "Alice")]),
    ];
    let expected_len: usize = stories.iter().map(|s| s.viewers.len()).sum();
    let uc = use_case(&platform(stories), None);

    let viewers = viewers_of(&uc.invoke(&request(dir.path(), PASSWORD, false)));

    assert_eq!(viewers.len(), expected_len);
    assert_eq!(viewers, vec!["Alice", "Bob", "Carol", "Alice"]);
}

#[test]
fn test_empty_full_name_falls_back_to_username() {
    let dir = tempfile::tempdir().unwrap();
    let uc = use_case(
        &platform(vec![FakeStory::new("s1", &[("dave_99", ""), ("erin", "Erin")])]),
        None,
    );

    let viewers = viewers_of(&uc.invoke(&request(dir.path(), PASSWORD, false)));

    assert_eq!(viewers, vec!["dave_99", "Erin"]);
}

#[test]
fn test_alice_bob_alice_on_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = Arc::new(MemoryTable::new());
    let uc = use_case(
        &platform(vec![
            FakeStory::new("s1", &[("alice", "Alice"), ("bob", "Bob")]),
            FakeStory::new("s2", &[("alice", "Alice")]),
        ]),
        Some(&table),
    );

    let response = uc.invoke(&request(dir.path(), PASSWORD, true));

    assert_eq!(
        response.body(),
        json!({
            "viewers": ["Alice", "Bob", "Alice"],
            "inserted": ["Alice", "Bob"],
            "already_present": [],
            "failed": []
        })
    );
    assert_eq!(table.rows(), vec!["Alice", "Bob"]);
}

#[test]
fn test_second_run_inserts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let table = Arc::new(MemoryTable::new());
    let uc = use_case(
        &platform(vec![FakeStory::new("s1", &[("alice", "Alice"), ("bob", "Bob")])]),
        Some(&table),
    );
    let req = request(dir.path(), PASSWORD, true);

    let _ = uc.invoke(&req);
    let rows_after_first = table.rows();
    let second = uc.invoke(&req);

    match second {
        InvocationResponse::Success {
            report: Some(report),
            ..
        } => {
            assert!(report.inserted.is_empty());
            assert_eq!(report.already_present, vec!["Alice", "Bob"]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(table.rows(), rows_after_first);
}

#[test]
fn test_platform_failure_aborts_without_partial_result() {
    let dir = tempfile::tempdir().unwrap();
    let table = Arc::new(MemoryTable::new());
    let platform = Arc::new(
        FakePlatform::new(USERNAME, PASSWORD)
            .with_stories(vec![
                FakeStory::new("s1", &[("alice", "Alice")]),
                FakeStory::new("s2", &[("bob", "Bob")]),
            ])
            .failing_viewers_of("s2"),
    );
    let uc = use_case(&platform, Some(&table));

    let response = uc.invoke(&request(dir.path(), PASSWORD, true));

    match &response {
        InvocationResponse::Failure { kind, message } => {
            assert_eq!(*kind, FailureKind::Platform);
            assert!(message.contains("s2"), "message: {}", message);
            // セッショントークンは伏せ字になる
            assert!(!message.contains(&platform.token()), "message: {}", message);
            assert!(message.contains("***"));
        }
        other => panic!("unexpected {:?}", other),
    }
    assert_eq!(response.status_code(), 502);
    assert_eq!(response.exit_code(), 1);
    assert!(table.rows().is_empty(), "nothing is synced after an aborted run");
}

#[test]
fn test_collect_only_skips_reconciliation() {
    let dir = tempfile::tempdir().unwrap();
    let uc = use_case(&platform(vec![FakeStory::new("s1", &[("bob", "Bob")])]), None);

    let response = uc.invoke(&request(dir.path(), PASSWORD, false));

    assert_eq!(response.body(), json!({"viewers": ["Bob"]}));
}

#[test]
fn test_reconcile_without_table_is_internal_failure() {
    let dir = tempfile::tempdir().unwrap();
    let uc = use_case(&platform(vec![]), None);

    let response = uc.invoke(&request(dir.path(), PASSWORD, true));

    assert_eq!(response.status_code(), 500);
    assert!(response.body()["error"]
        .as_str()
        .unwrap()
        .contains("--collect-only"));
}

#[test]
fn test_per_name_failure_is_reported_and_run_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    let table = Arc::new(MemoryTable::new().failing_on("Bob"));
    let uc = use_case(
        &platform(vec![FakeStory::new(
            "s1",
            &[("alice", "Alice"), ("bob", "Bob"), ("carol", "Carol")],
        )]),
        Some(&table),
    );

    let response = uc.invoke(&request(dir.path(), PASSWORD, true));

    assert_eq!(response.status_code(), 200);
    let body = response.body();
    assert_eq!(body["inserted"], json!(["Alice", "Carol"]));
    assert_eq!(body["failed"][0]["name"], json!("Bob"));
    assert_eq!(table.rows(), vec!["Alice", "Carol"]);
}
