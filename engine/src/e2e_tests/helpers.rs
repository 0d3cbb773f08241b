//! Common helpers for end-to-end tests.

use crate::btree::{BTree, Key};
use crate::simulation::InvariantChecker;

/// Insertion order used by the reference scenarios.
pub const SCENARIO_KEYS: [Key; 8] = [10, 20, 5, 6, 12, 30, 7, 17];

/// Build a tree by inserting `keys` in order.
pub fn tree_with(min_degree: usize, keys: &[Key]) -> BTree {
    let mut tree = BTree::new(min_degree).expect("create tree");
    for &key in keys {
        assert!(tree.insert(key), "insert {key}");
    }
    tree
}

/// The t=3 reference tree built from `SCENARIO_KEYS`.
pub fn scenario_tree() -> BTree {
    tree_with(3, &SCENARIO_KEYS)
}

/// Panic with every violation if `tree` breaks a structural invariant.
pub fn assert_valid(tree: &BTree) {
    let mut checker = InvariantChecker::new();
    checker.check_tree(tree, 0);
    assert!(
        !checker.has_violations(),
        "invariants violated: {:?}\nsnapshot: {:?}",
        checker.violations(),
        tree.snapshot()
    );
}
