//! Reconciler の単体テスト（MemoryTable を使用）

use std::sync::Arc;

use common::adapter::NoopLog;

use crate::adapter::MemoryTable;
use crate::domain::MatchMode;
use crate::usecase::reconcile::Reconciler;

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn reconciler(table: &Arc<MemoryTable>) -> Reconciler {
    Reconciler::new(Arc::clone(table) as _, Arc::new(NoopLog))
}

#[test]
fn test_reconcile_is_idempotent() {
    let table = Arc::new(MemoryTable::new());
    let input = names(&["Alice", "Bob"]);

    let first = reconciler(&table).reconcile(&input);
    let rows = table.rows();
    let second = reconciler(&table).reconcile(&input);

    assert_eq!(first.inserted, input);
    assert!(second.inserted.is_empty());
    assert_eq!(second.already_present, input);
    assert_eq!(table.rows(), rows);
}

#[test]
fn test_one_row_per_distinct_name() {
    let table = Arc::new(MemoryTable::new());
    let input = names(&["Bob", "Alice", "Bob", "Bob", "Alice", "Carol"]);

    let report = reconciler(&table).reconcile(&input);

    assert_eq!(report.inserted, names(&["Bob", "Alice", "Carol"]));
    assert_eq!(report.distinct_names(), 3);
    assert_eq!(table.rows(), names(&["Bob", "Alice", "Carol"]));
}

#[test]
fn test_existing_rows_are_not_duplicated() {
    let table = Arc::new(MemoryTable::with_rows(&["Alice"]));

    let report = reconciler(&table).reconcile(&names(&["Alice", "Bob"]));

    assert_eq!(report.already_present, names(&["Alice"]));
    assert_eq!(report.inserted, names(&["Bob"]));
    assert_eq!(table.rows(), names(&["Alice", "Bob"]));
}

#[test]
fn test_failure_for_one_name_does_not_abort_batch() {
    let table = Arc::new(MemoryTable::new().failing_on("Bob"));

    let report = reconciler(&table).reconcile(&names(&["Alice", "Bob", "Carol", "Bob"]));

    assert!(!report.is_clean());
    assert_eq!(report.inserted, names(&["Alice", "Carol"]));
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "Bob");
    assert!(report.failed[0].message.contains("lookup of 'Bob' failed"));
}

#[test]
fn test_insert_failure_mid_batch_keeps_later_inserts() {
    let table = Arc::new(MemoryTable::with_rows(&["Dave"]).failing_create_on("Bob"));

    let report = reconciler(&table).reconcile(&names(&["Alice", "Bob", "Carol", "Dave"]));

    assert!(!report.is_clean());
    assert_eq!(report.inserted, names(&["Alice", "Carol"]));
    assert_eq!(report.already_present, names(&["Dave"]));
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "Bob");
    assert!(
        report.failed[0].message.contains("insert of 'Bob' failed"),
        "message: {}",
        report.failed[0].message
    );
    assert_eq!(table.rows(), names(&["Dave", "Alice", "Carol"]));
}

#[test]
fn test_exact_match_does_not_confuse_prefixes() {
    let table = Arc::new(MemoryTable::with_rows(&["Alice"]));

    let report = reconciler(&table).reconcile(&names(&["Al"]));

    assert_eq!(report.inserted, names(&["Al"]));
    assert_eq!(table.rows(), names(&["Alice", "Al"]));
}

#[test]
fn test_substring_match_has_false_positives() {
    let table = Arc::new(MemoryTable::with_rows(&["Alice"]).with_match_mode(MatchMode::Substring));

    let report = reconciler(&table).reconcile(&names(&["Al"]));

    // "Al" は既存の "Alice" に部分一致するため追加されない
    assert_eq!(report.already_present, names(&["Al"]));
    assert_eq!(table.rows(), names(&["Alice"]));
}

#[test]
fn test_empty_input_yields_empty_report() {
    let table = Arc::new(MemoryTable::new());
    let report = reconciler(&table).reconcile(&[]);
    assert!(report.is_clean());
    assert_eq!(report.distinct_names(), 0);
}
