//! Engine handle for multi-threaded callers.
//!
//! Operations are short and bounded, so a single lock around the whole tree
//! is held for the duration of each call. There is no per-node locking.

use std::sync::{Mutex, MutexGuard};

use crate::btree::event::StructuralEvent;
use crate::btree::node::Key;
use crate::btree::tree::{BTree, BTreeError, TreeStats};
use crate::btree::view::NodeView;

/// A `BTree` behind one exclusive lock.
///
/// Every method acquires the lock, runs the operation to completion and
/// releases it, so no caller can observe a partially applied split or merge.
#[derive(Debug)]
pub struct SharedBTree {
    inner: Mutex<BTree>,
}

impl SharedBTree {
    /// Create an empty shared tree with minimum degree `min_degree`.
    pub fn new(min_degree: usize) -> Result<Self, BTreeError> {
        Ok(Self::from_tree(BTree::new(min_degree)?))
    }

    /// Wrap an existing tree.
    #[must_use]
    pub const fn from_tree(tree: BTree) -> Self {
        Self {
            inner: Mutex::new(tree),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTree>, BTreeError> {
        self.inner.lock().map_err(|_| BTreeError::LockPoisoned)
    }

    /// See [`BTree::insert`].
    pub fn insert(&self, key: Key) -> Result<bool, BTreeError> {
        Ok(self.lock()?.insert(key))
    }

    /// Insert `key` and return the structural events it caused, read under the same lock.
    pub fn insert_with_events(&self, key: Key) -> Result<(bool, Vec<StructuralEvent>), BTreeError> {
        let mut tree = self.lock()?;
        let inserted = tree.insert(key);
        Ok((inserted, tree.last_events().to_vec()))
    }

    /// See [`BTree::delete`].
    pub fn delete(&self, key: Key) -> Result<bool, BTreeError> {
        Ok(self.lock()?.delete(key))
    }

    /// Delete `key` and return the structural events it caused, read under the same lock.
    pub fn delete_with_events(&self, key: Key) -> Result<(bool, Vec<StructuralEvent>), BTreeError> {
        let mut tree = self.lock()?;
        let removed = tree.delete(key);
        Ok((removed, tree.last_events().to_vec()))
    }

    /// See [`BTree::search`].
    pub fn search(&self, key: Key) -> Result<bool, BTreeError> {
        Ok(self.lock()?.search(key))
    }

    /// See [`BTree::snapshot`].
    pub fn snapshot(&self) -> Result<Option<NodeView>, BTreeError> {
        Ok(self.lock()?.snapshot())
    }

    /// See [`BTree::total_keys`].
    pub fn total_keys(&self) -> Result<usize, BTreeError> {
        Ok(self.lock()?.total_keys())
    }

    /// See [`BTree::height`].
    pub fn height(&self) -> Result<Option<usize>, BTreeError> {
        Ok(self.lock()?.height())
    }

    /// See [`BTree::stats`].
    pub fn stats(&self) -> Result<TreeStats, BTreeError> {
        Ok(self.lock()?.stats())
    }

    /// Unwrap the inner tree.
    pub fn into_inner(self) -> Result<BTree, BTreeError> {
        self.inner.into_inner().map_err(|_| BTreeError::LockPoisoned)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::simulation::InvariantChecker;

    #[test]
    fn test_concurrent_inserts_are_serialized() {
        let shared = SharedBTree::new(3).expect("create tree");

        thread::scope(|scope| {
            for worker in 0..4 {
                let shared = &shared;
                scope.spawn(move || {
                    for i in 0..250 {
                        let key = worker * 1000 + i;
                        assert!(shared.insert(key).expect("insert"));
                    }
                });
            }
        });

        assert_eq!(shared.total_keys().expect("total keys"), 1000);
        assert!(shared.search(3249).expect("search"));
        assert!(!shared.search(3250).expect("search"));

        let tree = shared.into_inner().expect("into inner");
        let mut checker = InvariantChecker::new();
        checker.check_tree(&tree, 0);
        assert!(!checker.has_violations(), "{:?}", checker.violations());
    }

    #[test]
    fn test_concurrent_mixed_operations() {
        let shared = SharedBTree::new(2).expect("create tree");
        for key in 0..400 {
            shared.insert(key).expect("insert");
        }

        thread::scope(|scope| {
            scope.spawn(|| {
                for key in (0..400).step_by(2) {
                    assert!(shared.delete(key).expect("delete"));
                }
            });
            scope.spawn(|| {
                for key in 400..600 {
                    assert!(shared.insert(key).expect("insert"));
                }
            });
            scope.spawn(|| {
                for _ in 0..50 {
                    let snapshot = shared.snapshot().expect("snapshot");
                    let mut checker = InvariantChecker::new();
                    checker.check_structure(snapshot.as_ref(), 2, 0);
                    assert!(!checker.has_violations(), "{:?}", checker.violations());
                }
            });
        });

        assert_eq!(shared.total_keys().expect("total keys"), 400);
    }

    #[test]
    fn test_events_read_under_same_lock() {
        let shared = SharedBTree::new(2).expect("create tree");
        for key in 1..=3 {
            shared.insert(key).expect("insert");
        }

        let (inserted, events) = shared.insert_with_events(4).expect("insert");
        assert!(inserted);
        assert_eq!(events, vec![StructuralEvent::RootSplit { median: 2 }]);

        let (removed, events) = shared.delete_with_events(99).expect("delete");
        assert!(!removed);
        assert!(events.is_empty());
    }

    #[test]
    fn test_poisoned_lock_is_reported() {
        let shared = SharedBTree::new(3).expect("create tree");

        let result = thread::scope(|scope| {
            scope
                .spawn(|| {
                    let _guard = shared.inner.lock().expect("lock");
                    panic!("poison the lock");
                })
                .join()
        });
        assert!(result.is_err());

        assert_eq!(shared.insert(1), Err(BTreeError::LockPoisoned));
        assert_eq!(shared.snapshot(), Err(BTreeError::LockPoisoned));
    }
}
