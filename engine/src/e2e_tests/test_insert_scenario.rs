//! Test the t=3 reference insertion sequence.

use crate::btree::{BTree, NodeView, StructuralEvent};
use crate::e2e_tests::helpers::*;

#[test]
fn test_reference_insertions_split_root_once() {
    let mut tree = BTree::new(3).expect("create tree");
    let mut root_splits = Vec::new();

    for key in SCENARIO_KEYS {
        assert!(tree.insert(key));
        assert_valid(&tree);

        for event in tree.last_events() {
            if let StructuralEvent::RootSplit { median } = event {
                root_splits.push((key, *median));
            }
        }
    }

    // The root fills up after 5 keys; inserting 30 splits it around 10
    assert_eq!(root_splits, vec![(30, 10)]);
    assert_eq!(tree.height(), Some(1));
    assert_eq!(tree.total_keys(), 8);
}

#[test]
fn test_reference_tree_shape() {
    let tree = scenario_tree();

    assert_eq!(
        tree.snapshot(),
        Some(NodeView::internal(
            vec![10],
            vec![
                NodeView::leaf(vec![5, 6, 7]),
                NodeView::leaf(vec![12, 17, 20, 30]),
            ],
        ))
    );
}

#[test]
fn test_reference_tree_search() {
    let tree = scenario_tree();

    for key in SCENARIO_KEYS {
        assert!(tree.search(key), "{key} should be present");
    }
    assert!(tree.search(6));
    assert!(!tree.search(99));
    assert!(!tree.search(15));
    assert!(!tree.search(-1));
}

#[test]
fn test_height_grows_only_on_root_split() {
    let mut tree = BTree::new(2).expect("create tree");
    let mut height = tree.height();

    for key in 0..200 {
        tree.insert(key);
        let grew = tree
            .last_events()
            .iter()
            .any(|e| matches!(e, StructuralEvent::RootSplit { .. }));

        if grew {
            assert_eq!(tree.height(), height.map(|h| h + 1));
        } else if height.is_some() {
            assert_eq!(tree.height(), height);
        }
        height = tree.height();
    }
}
