//! Test the empty-tree sentinel values and construction errors.

use crate::btree::{BTree, BTreeError, NodeView};
use crate::e2e_tests::helpers::*;

#[test]
fn test_new_tree_is_empty() {
    let tree = BTree::new(3).expect("create tree");

    assert!(tree.is_empty());
    assert_eq!(tree.snapshot(), None);
    assert_eq!(tree.height(), None);
    assert_eq!(tree.total_keys(), 0);
}

#[test]
fn test_delete_last_key_returns_to_empty() {
    let mut tree = tree_with(3, &[42]);
    assert_eq!(tree.height(), Some(0));

    assert!(tree.delete(42));

    assert_eq!(tree.snapshot(), None);
    assert_eq!(tree.height(), None);
    assert_eq!(tree.total_keys(), 0);
    assert!(!tree.search(42));
}

#[test]
fn test_delete_all_keys() {
    let mut tree = tree_with(3, &[10, 20, 5]);

    assert!(tree.delete(10));
    assert!(tree.delete(20));
    assert!(tree.delete(5));

    assert!(tree.is_empty());
    assert_eq!(tree.total_keys(), 0);
    for key in [10, 20, 5] {
        assert!(!tree.search(key));
    }
}

#[test]
fn test_tree_is_reusable_after_emptying() {
    let mut tree = tree_with(2, &[1, 2, 3, 4, 5]);
    for key in 1..=5 {
        assert!(tree.delete(key));
    }
    assert!(tree.is_empty());

    assert!(tree.insert(8));
    assert_eq!(tree.snapshot(), Some(NodeView::leaf(vec![8])));
    assert_valid(&tree);
}

#[test]
fn test_invalid_min_degree_rejected() {
    for min_degree in [0, 1] {
        assert_eq!(
            BTree::new(min_degree).err(),
            Some(BTreeError::InvalidMinDegree { min_degree })
        );
    }
}
