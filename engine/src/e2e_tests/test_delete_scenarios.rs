//! Test deletion from the t=3 reference tree: leaf removal, borrowing,
//! merging, internal-key replacement and root collapse.

use crate::btree::{Key, NodeView, StructuralEvent};
use crate::e2e_tests::helpers::*;

#[test]
fn test_delete_leaf_key() {
    let mut tree = scenario_tree();

    assert!(tree.delete(6));

    assert_valid(&tree);
    assert_eq!(tree.total_keys(), 7);
    assert!(!tree.search(6));
    assert_eq!(
        tree.snapshot(),
        Some(NodeView::internal(
            vec![10],
            vec![
                NodeView::leaf(vec![5, 7]),
                NodeView::leaf(vec![12, 17, 20, 30]),
            ],
        ))
    );
}

#[test]
fn test_deficient_child_borrows_then_merges() {
    let mut tree = scenario_tree();
    assert!(tree.delete(6));

    // [5, 7] is minimal and its right sibling has a spare key
    assert!(tree.delete(5));
    assert_valid(&tree);
    assert_eq!(
        tree.last_events(),
        &[StructuralEvent::BorrowFromRight {
            moved_up: 12,
            moved_down: 10
        }]
    );
    assert_eq!(
        tree.snapshot(),
        Some(NodeView::internal(
            vec![12],
            vec![NodeView::leaf(vec![7, 10]), NodeView::leaf(vec![17, 20, 30])],
        ))
    );

    assert!(tree.delete(7));
    assert_valid(&tree);
    assert_eq!(
        tree.last_events(),
        &[StructuralEvent::BorrowFromRight {
            moved_up: 17,
            moved_down: 12
        }]
    );

    // Both children minimal: merge and the root collapses
    assert!(tree.delete(20));
    assert_valid(&tree);
    assert_eq!(
        tree.last_events(),
        &[
            StructuralEvent::Merge { separator: 17 },
            StructuralEvent::RootCollapse
        ]
    );
    assert_eq!(tree.snapshot(), Some(NodeView::leaf(vec![10, 12, 17, 30])));
    assert_eq!(tree.height(), Some(0));
    assert_eq!(tree.total_keys(), 4);
}

#[test]
fn test_borrow_from_left_sibling() {
    let mut tree = scenario_tree();

    // Right child drops to the minimum, left keeps a spare key
    assert!(tree.delete(17));
    assert!(tree.delete(20));
    assert!(tree.delete(30));
    assert_valid(&tree);

    assert_eq!(
        tree.last_events(),
        &[StructuralEvent::BorrowFromLeft {
            moved_up: 7,
            moved_down: 10
        }]
    );
    assert_eq!(
        tree.snapshot(),
        Some(NodeView::internal(
            vec![7],
            vec![NodeView::leaf(vec![5, 6]), NodeView::leaf(vec![10, 12])],
        ))
    );
}

#[test]
fn test_delete_internal_key_uses_predecessor() {
    let mut tree = scenario_tree();

    assert!(tree.delete(10));

    assert_valid(&tree);
    assert!(!tree.search(10));
    assert!(tree.search(5));
    assert!(tree.search(20));
    assert_eq!(tree.total_keys(), 7);
    assert_eq!(
        tree.snapshot(),
        Some(NodeView::internal(
            vec![7],
            vec![
                NodeView::leaf(vec![5, 6]),
                NodeView::leaf(vec![12, 17, 20, 30]),
            ],
        ))
    );
}

#[test]
fn test_delete_multiple_keys() {
    let mut tree = scenario_tree();

    assert!(tree.delete(6));
    assert!(tree.delete(12));
    assert!(tree.delete(30));
    assert_valid(&tree);

    for key in [6, 12, 30] {
        assert!(!tree.search(key), "{key} should be gone");
    }
    for key in [5, 7, 10, 17, 20] {
        assert!(tree.search(key), "{key} should still be present");
    }
    assert_eq!(tree.total_keys(), 5);
}

#[test]
fn test_insert_then_delete_restores_count() {
    let mut tree = scenario_tree();
    let before = tree.total_keys();

    assert!(tree.insert(99));
    assert!(tree.delete(99));

    assert_eq!(tree.total_keys(), before);
    assert!(!tree.search(99));
    assert_valid(&tree);
}

#[test]
fn test_delete_from_deep_tree_with_merges() {
    let mut tree = tree_with(3, &(1..=10).collect::<Vec<Key>>());
    let before = tree.total_keys();

    assert!(tree.delete(5));

    assert_valid(&tree);
    assert!(!tree.search(5));
    assert_eq!(tree.total_keys(), before - 1);
    assert!(tree.search(1));
    assert!(tree.search(10));
}
