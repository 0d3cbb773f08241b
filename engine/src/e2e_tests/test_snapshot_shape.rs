//! Test the snapshot as a detached, serializable value.

use crate::btree::{Key, StructuralEvent};
use crate::e2e_tests::helpers::*;

#[test]
fn test_snapshot_serializes_for_renderer() {
    let tree = scenario_tree();
    let json = serde_json::to_value(tree.snapshot()).expect("serialize");

    assert_eq!(
        json,
        serde_json::json!({
            "keys": [10],
            "isLeaf": false,
            "children": [
                {"keys": [5, 6, 7], "isLeaf": true, "children": []},
                {"keys": [12, 17, 20, 30], "isLeaf": true, "children": []},
            ],
        })
    );
}

#[test]
fn test_empty_snapshot_serializes_as_null() {
    let tree = tree_with(3, &[]);
    let json = serde_json::to_value(tree.snapshot()).expect("serialize");
    assert!(json.is_null());
}

#[test]
fn test_snapshot_is_detached_from_later_mutations() {
    let mut tree = scenario_tree();
    let snapshot = tree.snapshot().expect("non-empty");

    tree.delete(10);
    tree.insert(100);

    assert_eq!(snapshot.keys, vec![10]);
    assert_eq!(snapshot.key_count(), 8);
    assert_eq!(snapshot.keys_in_order(), vec![5, 6, 7, 10, 12, 17, 20, 30]);
}

#[test]
fn test_snapshot_metrics_match_tree() {
    let tree = tree_with(2, &(0..100).collect::<Vec<Key>>());
    let snapshot = tree.snapshot().expect("non-empty");

    assert_eq!(snapshot.key_count(), tree.total_keys());
    assert_eq!(Some(snapshot.height()), tree.height());
    assert_eq!(snapshot.keys_in_order(), tree.iter().collect::<Vec<Key>>());
}

#[test]
fn test_events_serialize_with_type_tag() {
    let events = [
        StructuralEvent::RootSplit { median: 10 },
        StructuralEvent::BorrowFromLeft {
            moved_up: 7,
            moved_down: 10,
        },
        StructuralEvent::RootCollapse,
    ];
    let json = serde_json::to_value(events).expect("serialize");

    assert_eq!(
        json,
        serde_json::json!([
            {"type": "rootSplit", "median": 10},
            {"type": "borrowFromLeft", "movedUp": 7, "movedDown": 10},
            {"type": "rootCollapse"},
        ])
    );
}
