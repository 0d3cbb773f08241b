//! Test the duplicate-key policy: duplicates are ignored, never stored twice.

use crate::btree::{SharedBTree, StructuralEvent};
use crate::e2e_tests::helpers::*;

#[test]
fn test_new_key_is_inserted() {
    let mut tree = scenario_tree();

    assert!(tree.insert(15));

    assert!(tree.search(15));
    assert_eq!(tree.total_keys(), 9);
    assert_valid(&tree);
}

#[test]
fn test_duplicate_key_is_ignored() {
    let mut tree = scenario_tree();
    let before = tree.snapshot();

    for key in SCENARIO_KEYS {
        assert!(!tree.insert(key), "duplicate {key} must be ignored");
        assert!(tree.last_events().is_empty());
    }

    assert_eq!(tree.snapshot(), before);
    assert_eq!(tree.total_keys(), SCENARIO_KEYS.len());
}

#[test]
fn test_duplicate_into_full_root_does_not_split() {
    let mut tree = tree_with(3, &[1, 2, 3, 4, 5]);

    assert!(!tree.insert(5));
    assert_eq!(tree.height(), Some(0));

    // A fresh key does split the full root
    assert!(tree.insert(6));
    assert_eq!(tree.last_events(), &[StructuralEvent::RootSplit { median: 3 }]);
    assert_eq!(tree.height(), Some(1));
}

#[test]
fn test_duplicate_of_separator_key() {
    let mut tree = scenario_tree();
    // 10 lives in the root, not in a leaf
    assert!(!tree.insert(10));
    assert_eq!(tree.total_keys(), 8);
}

#[test]
fn test_delete_of_deleted_key_is_noop() {
    let mut tree = scenario_tree();
    assert!(tree.delete(6));
    let after_first = tree.snapshot();

    assert!(!tree.delete(6));
    assert_eq!(tree.snapshot(), after_first);
    assert_eq!(tree.total_keys(), 7);
}

#[test]
fn test_shared_tree_duplicate_policy() {
    let shared = SharedBTree::new(3).expect("create tree");
    assert_eq!(shared.insert(1), Ok(true));
    assert_eq!(shared.insert(1), Ok(false));
    assert_eq!(shared.total_keys(), Ok(1));
}
