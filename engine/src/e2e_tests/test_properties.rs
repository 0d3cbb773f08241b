//! Randomized property tests over seeded key sequences.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::btree::{BTree, Key};
use crate::e2e_tests::helpers::*;

fn shuffled_keys(seed: u64, count: Key) -> Vec<Key> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut keys: Vec<Key> = (0..count).map(|k| k * 3).collect();
    keys.shuffle(&mut rng);
    keys
}

#[test]
fn test_invariants_hold_after_every_insertion() {
    for min_degree in 2..=5 {
        let mut tree = BTree::new(min_degree).expect("create tree");
        for key in shuffled_keys(11, 400) {
            tree.insert(key);
            assert_valid(&tree);
        }
    }
}

#[test]
fn test_search_matches_inserted_keys() {
    let keys = shuffled_keys(21, 500);
    let tree = tree_with(3, &keys);

    // Inserted keys are multiples of 3, everything else was never inserted
    for key in 0..1500 {
        assert_eq!(tree.search(key), key % 3 == 0, "search({key})");
    }
}

#[test]
fn test_total_keys_tracks_successful_mutations() {
    let mut rng = StdRng::seed_from_u64(31);
    let mut tree = BTree::new(2).expect("create tree");
    let mut inserted = 0usize;
    let mut deleted = 0usize;

    for _ in 0..3000 {
        let key = rng.random_range(0..100);
        if rng.random_bool(0.6) {
            if tree.insert(key) {
                inserted += 1;
            }
        } else if tree.delete(key) {
            deleted += 1;
        }
        assert_eq!(tree.total_keys(), inserted - deleted);
    }
    assert_valid(&tree);
}

#[test]
fn test_height_never_decreases_on_insert() {
    for min_degree in 2..=4 {
        let mut tree = BTree::new(min_degree).expect("create tree");
        let mut previous = tree.height();
        for key in shuffled_keys(41, 600) {
            tree.insert(key);
            assert!(tree.height() >= previous);
            previous = tree.height();
        }
    }
}

#[test]
fn test_insert_then_delete_is_transparent() {
    let mut rng = StdRng::seed_from_u64(51);
    let mut tree = tree_with(3, &shuffled_keys(52, 200));

    for _ in 0..200 {
        // Keys not divisible by 3 are never in the base tree
        let key = rng.random_range(0..200) * 3 + 1;
        let before = tree.total_keys();

        assert!(tree.insert(key));
        assert!(tree.delete(key));

        assert_eq!(tree.total_keys(), before);
        assert!(!tree.search(key));
    }
    assert_valid(&tree);
}

#[test]
fn test_random_deletes_keep_invariants() {
    for min_degree in 2..=5 {
        let keys = shuffled_keys(61, 300);
        let mut tree = tree_with(min_degree, &keys);
        let mut remaining: BTreeSet<Key> = keys.iter().copied().collect();

        let mut order = keys;
        order.shuffle(&mut StdRng::seed_from_u64(62));

        for key in order {
            assert!(tree.delete(key));
            remaining.remove(&key);
            assert_valid(&tree);
            assert!(tree.iter().eq(remaining.iter().copied()));
        }
        assert!(tree.is_empty());
        assert_eq!(tree.height(), None);
    }
}
