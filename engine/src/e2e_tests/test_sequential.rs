//! Test ascending and descending insert / delete runs across degrees.

use crate::btree::Key;
use crate::e2e_tests::helpers::*;

#[test]
fn test_delete_sequential() {
    let mut tree = tree_with(3, &(1..=20).collect::<Vec<Key>>());
    assert_eq!(tree.total_keys(), 20);

    for key in 1..=10 {
        assert!(tree.delete(key), "key {key} should be deleted");
        assert!(!tree.search(key), "key {key} should not be present");
        assert_valid(&tree);
    }

    assert_eq!(tree.total_keys(), 10);
    for key in 11..=20 {
        assert!(tree.search(key), "key {key} should still be present");
    }
}

#[test]
fn test_delete_reverse_sequential() {
    let mut tree = tree_with(3, &(1..=10).collect::<Vec<Key>>());

    for key in (1..=10).rev() {
        assert!(tree.delete(key), "key {key} should be deleted");
        assert!(!tree.search(key), "key {key} should not be present");
        assert_valid(&tree);
    }

    assert_eq!(tree.total_keys(), 0);
    assert!(tree.is_empty());
}

#[test]
fn test_ascending_and_descending_runs_all_degrees() {
    for min_degree in 2..=6 {
        let ascending: Vec<Key> = (0..300).collect();
        let descending: Vec<Key> = (0..300).rev().collect();

        for keys in [&ascending, &descending] {
            let mut tree = tree_with(min_degree, keys);
            assert_valid(&tree);
            assert_eq!(tree.total_keys(), 300);
            assert_eq!(tree.iter().collect::<Vec<_>>(), ascending);

            // Remove from the middle outwards
            for (count, (low, high)) in (0..150).rev().zip(150..300).enumerate() {
                assert!(tree.delete(low));
                assert!(tree.delete(high));
                assert_eq!(tree.total_keys(), 300 - 2 * (count + 1));
            }
            assert_valid(&tree);
            assert!(tree.is_empty());
        }
    }
}

#[test]
fn test_negative_and_extreme_keys() {
    let keys = [i64::MIN, -5, 0, 5, i64::MAX, -1_000_000, 1_000_000];
    let mut tree = tree_with(2, &keys);
    assert_valid(&tree);

    let mut sorted = keys.to_vec();
    sorted.sort_unstable();
    assert_eq!(tree.iter().collect::<Vec<_>>(), sorted);

    assert!(tree.delete(i64::MIN));
    assert!(tree.delete(i64::MAX));
    assert!(!tree.search(i64::MIN));
    assert_valid(&tree);
}
