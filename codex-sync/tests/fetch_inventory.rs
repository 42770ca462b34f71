//! Remote inventory paging and record filtering against a fake store.

mod common;

use common::{record, Call, FakeStore};
use codex_sync::{remote::fetch_inventory, ContentPage, SyncError};
use serde_json::json;

fn page(records: Vec<serde_json::Value>, total: Option<u64>) -> ContentPage {
    ContentPage {
        data: records,
        total_record: total,
    }
}

#[test]
fn stops_when_reported_total_is_reached() {
    let store = FakeStore {
        pages: vec![
            page(
                vec![record("r1", "a.md", ""), record("r2", "b.md", "")],
                Some(4),
            ),
            page(
                vec![record("r3", "c.md", ""), record("r4", "d.md", "")],
                Some(4),
            ),
            page(vec![record("r5", "never.md", "")], Some(4)),
        ],
        ..FakeStore::default()
    };

    let inventory = fetch_inventory(&store, "codex", 2).expect("fetch");
    assert_eq!(inventory.records.len(), 4);
    assert_eq!(
        store.calls(),
        vec![
            Call::List { page: 1, num_items: 2 },
            Call::List { page: 2, num_items: 2 },
        ]
    );
}

#[test]
fn short_page_ends_paging_without_a_total() {
    let store = FakeStore {
        pages: vec![
            page(vec![record("r1", "a.md", ""), record("r2", "b.md", "")], None),
            page(vec![record("r3", "c.md", "")], None),
        ],
        ..FakeStore::default()
    };

    let inventory = fetch_inventory(&store, "codex", 2).expect("fetch");
    assert_eq!(inventory.records.len(), 3);
    assert_eq!(store.calls().len(), 2);
}

#[test]
fn short_page_wins_over_an_inflated_total() {
    let store = FakeStore {
        pages: vec![page(vec![record("r1", "a.md", "")], Some(500))],
        ..FakeStore::default()
    };
    let inventory = fetch_inventory(&store, "codex", 10).expect("fetch");
    assert_eq!(inventory.records.len(), 1);
    assert_eq!(store.calls().len(), 1);
}

#[test]
fn empty_listing_is_a_valid_inventory() {
    let store = FakeStore::default();
    let inventory = fetch_inventory(&store, "codex", 100).expect("fetch");
    assert!(inventory.records.is_empty());
    assert_eq!(inventory.skipped(), 0);
}

#[test]
fn bad_records_are_counted_by_reason_and_never_abort() {
    let store = FakeStore::with_records(vec![
        record("r1", "keep.md", "2024-01-01T00:00:00Z"),
        json!({ "id": "r2" }),
        json!(["not", "an", "object"]),
        record("r3", "d4c1a7e2-1b2c-4d5e-8f90-123456789abc", ""),
        record("r4", "2024-01-01T00:00:00Z", ""),
    ]);

    let inventory = fetch_inventory(&store, "codex", 100).expect("fetch");
    assert_eq!(inventory.records.len(), 1);
    assert_eq!(inventory.records[0].title, "keep.md");
    assert_eq!(inventory.malformed, 2);
    assert_eq!(inventory.corrupted, 2);
}

#[test]
fn listing_failure_is_fatal() {
    let store = FakeStore {
        listing_status: Some(401),
        ..FakeStore::default()
    };
    let err = fetch_inventory(&store, "codex", 100).unwrap_err();
    assert!(matches!(err, SyncError::Listing { page: 1, .. }), "got: {err}");
    assert!(err.to_string().contains("401"));
    assert_eq!(store.calls().len(), 1, "listing is never retried");
}
