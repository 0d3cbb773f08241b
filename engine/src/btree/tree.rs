//! The B-tree engine.
//!
//! Owns the root node and exposes the mutation, query and snapshot
//! operations a renderer drives. Height and key counts are recomputed by
//! traversal on demand rather than stored.

use std::fmt;

use tracing::debug;

use crate::btree::event::StructuralEvent;
use crate::btree::node::{Key, Node};
use crate::btree::view::NodeView;
use crate::config::EngineConfig;

/// Smallest minimum degree a tree accepts.
pub const MIN_ALLOWED_DEGREE: usize = 2;

/// Largest minimum degree a tree accepts, so `2t` always fits in a `usize`.
pub const MAX_ALLOWED_DEGREE: usize = usize::MAX / 2;

/// Minimum degree used by `BTree::default()`.
pub const DEFAULT_MIN_DEGREE: usize = 3;

/// An in-memory B-tree of minimum degree `t`.
///
/// # Invariants
///
/// - Every non-root node holds between `t-1` and `2t-1` keys
/// - The root holds at most `2t-1` keys and is `None` exactly when the tree is empty
/// - An internal node with `k` keys has `k+1` children
/// - Keys within a node are strictly increasing and separate their children's ranges
/// - All leaves are at the same depth
#[derive(Debug, Clone)]
pub struct BTree {
    root: Option<Node>,
    min_degree: usize,
    /// Structural events caused by the most recent insert or delete.
    events: Vec<StructuralEvent>,
}

impl BTree {
    /// Create an empty tree with minimum degree `min_degree`.
    ///
    /// # Errors
    ///
    /// Returns `BTreeError::InvalidMinDegree` if `min_degree` is outside
    /// `MIN_ALLOWED_DEGREE..=MAX_ALLOWED_DEGREE`.
    pub fn new(min_degree: usize) -> Result<Self, BTreeError> {
        if !(MIN_ALLOWED_DEGREE..=MAX_ALLOWED_DEGREE).contains(&min_degree) {
            return Err(BTreeError::InvalidMinDegree { min_degree });
        }

        debug!(min_degree, "created empty B-tree");

        Ok(Self {
            root: None,
            min_degree,
            events: Vec::new(),
        })
    }

    /// Create an empty tree using the configured minimum degree.
    pub fn with_config(config: &EngineConfig) -> Result<Self, BTreeError> {
        Self::new(config.min_degree)
    }

    #[must_use]
    pub const fn min_degree(&self) -> usize {
        self.min_degree
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Check whether `key` is stored in the tree.
    #[must_use]
    pub fn search(&self, key: Key) -> bool {
        self.root.as_ref().is_some_and(|root| root.contains(key))
    }

    /// Insert `key`.
    ///
    /// Duplicates are ignored: if the key is already present the tree is left
    /// untouched and `false` is returned.
    pub fn insert(&mut self, key: Key) -> bool {
        self.events.clear();

        // Checked up front so a duplicate never triggers a proactive split
        if self.search(key) {
            return false;
        }

        let min_degree = self.min_degree;
        let root = match self.root.take() {
            None => Node::new_leaf(),
            Some(root) if root.is_full(min_degree) => {
                // The only place the tree grows taller
                let mut new_root = Node::with_only_child(root);
                let median = new_root.split_child(0, min_degree);
                debug!(median, "root split, tree height increased");
                self.events.push(StructuralEvent::RootSplit { median });
                new_root
            }
            Some(root) => root,
        };

        self.root
            .insert(root)
            .insert_non_full(key, min_degree, &mut self.events)
    }

    /// Delete `key`.
    ///
    /// Returns `false` and leaves the tree untouched if the key is absent.
    pub fn delete(&mut self, key: Key) -> bool {
        self.events.clear();

        // Absent keys must not trigger the rebalancing pass
        if !self.search(key) {
            return false;
        }

        let Some(root) = self.root.as_mut() else {
            return false;
        };

        let removed = root.remove(key, self.min_degree, &mut self.events);

        if root.keys.is_empty() {
            if root.is_leaf() {
                debug!("last key removed, tree is empty");
            } else {
                debug!("root collapsed, tree height decreased");
                self.events.push(StructuralEvent::RootCollapse);
            }
            // A key-less internal root has exactly one child; a key-less leaf has none
            self.root = root.children.pop();
        }

        removed
    }

    /// Remove every key.
    pub fn clear(&mut self) {
        self.root = None;
        self.events.clear();
    }

    /// Deep-copy the current structure, or `None` for an empty tree.
    #[must_use]
    pub fn snapshot(&self) -> Option<NodeView> {
        self.root.as_ref().map(Node::view)
    }

    /// Total number of keys, computed by a full traversal.
    #[must_use]
    pub fn total_keys(&self) -> usize {
        self.root.as_ref().map_or(0, Node::count_keys)
    }

    /// Number of edges from the root to any leaf.
    ///
    /// `Some(0)` for a single-node tree, `None` for an empty tree.
    #[must_use]
    pub fn height(&self) -> Option<usize> {
        self.root.as_ref().map(Node::depth)
    }

    /// Summary metrics for display alongside a snapshot.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            total_keys: self.total_keys(),
            height: self.height(),
            node_count: self.root.as_ref().map_or(0, Node::count_nodes),
            leaf_count: self.root.as_ref().map_or(0, Node::count_leaves),
            min_degree: self.min_degree,
        }
    }

    /// Structural events caused by the most recent insert or delete.
    ///
    /// Empty if that mutation only touched a single leaf or changed nothing.
    #[must_use]
    pub fn last_events(&self) -> &[StructuralEvent] {
        &self.events
    }

    /// Iterate over all keys in ascending order.
    #[must_use]
    pub fn iter(&self) -> Keys<'_> {
        Keys::new(self.root.as_ref())
    }
}

impl Default for BTree {
    fn default() -> Self {
        Self {
            root: None,
            min_degree: DEFAULT_MIN_DEGREE,
            events: Vec::new(),
        }
    }
}

impl fmt::Display for BTree {
    /// Space-separated in-order traversal.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a BTree {
    type Item = Key;
    type IntoIter = Keys<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Summary metrics of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub total_keys: usize,
    /// `None` for an empty tree.
    pub height: Option<usize>,
    pub node_count: usize,
    pub leaf_count: usize,
    pub min_degree: usize,
}

/// In-order iterator over the keys of a tree.
pub struct Keys<'a> {
    /// Path from the root to the current node. Each entry holds the index of
    /// the next key to yield from that node.
    stack: Vec<(&'a Node, usize)>,
}

impl<'a> Keys<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut keys = Self { stack: Vec::new() };
        if let Some(root) = root {
            keys.push_leftmost_path(root);
        }
        keys
    }

    fn push_leftmost_path(&mut self, mut node: &'a Node) {
        loop {
            self.stack.push((node, 0));
            match node.children.first() {
                Some(child) => node = child,
                None => break,
            }
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = Key;

    fn next(&mut self) -> Option<Key> {
        loop {
            let (node, idx) = self.stack.pop()?;
            if let Some(&key) = node.keys.get(idx) {
                self.stack.push((node, idx + 1));
                if let Some(child) = node.children.get(idx + 1) {
                    self.push_leftmost_path(child);
                }
                return Some(key);
            }
        }
    }
}

/// Errors returned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// The minimum degree is below 2 or above `MAX_ALLOWED_DEGREE`.
    InvalidMinDegree { min_degree: usize },
    /// A thread panicked while holding the engine lock.
    LockPoisoned,
}

impl fmt::Display for BTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMinDegree { min_degree } => write!(
                f,
                "invalid minimum degree {min_degree}: must be between {MIN_ALLOWED_DEGREE} and {MAX_ALLOWED_DEGREE}"
            ),
            Self::LockPoisoned => write!(f, "engine lock poisoned"),
        }
    }
}

impl std::error::Error for BTreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(min_degree: usize, keys: &[Key]) -> BTree {
        let mut tree = BTree::new(min_degree).expect("create tree");
        for &key in keys {
            assert!(tree.insert(key), "insert {key}");
        }
        tree
    }

    #[test]
    fn test_rejects_min_degree_below_two() {
        assert_eq!(
            BTree::new(1).unwrap_err(),
            BTreeError::InvalidMinDegree { min_degree: 1 }
        );
        assert_eq!(
            BTree::new(0).unwrap_err(),
            BTreeError::InvalidMinDegree { min_degree: 0 }
        );
        assert!(BTree::new(2).is_ok());
    }

    #[test]
    fn test_rejects_min_degree_whose_node_capacity_overflows() {
        assert_eq!(
            BTree::new(usize::MAX).unwrap_err(),
            BTreeError::InvalidMinDegree {
                min_degree: usize::MAX
            }
        );
        assert_eq!(
            BTree::new(MAX_ALLOWED_DEGREE + 1).unwrap_err(),
            BTreeError::InvalidMinDegree {
                min_degree: MAX_ALLOWED_DEGREE + 1
            }
        );

        let mut tree = BTree::new(MAX_ALLOWED_DEGREE).expect("largest degree is accepted");
        for key in 0..10 {
            assert!(tree.insert(key));
        }
        assert!(tree.delete(4));
        assert_eq!(tree.total_keys(), 9);
        assert_eq!(tree.height(), Some(0));
    }

    #[test]
    fn test_error_display() {
        let error = BTreeError::InvalidMinDegree { min_degree: 1 };
        assert_eq!(
            error.to_string(),
            format!("invalid minimum degree 1: must be between 2 and {MAX_ALLOWED_DEGREE}")
        );
        assert_eq!(BTreeError::LockPoisoned.to_string(), "engine lock poisoned");
    }

    #[test]
    fn test_default_uses_degree_three() {
        let tree = BTree::default();
        assert_eq!(tree.min_degree(), DEFAULT_MIN_DEGREE);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_empty_tree_queries() {
        let tree = BTree::new(3).expect("create tree");
        assert!(!tree.search(1));
        assert_eq!(tree.snapshot(), None);
        assert_eq!(tree.total_keys(), 0);
        assert_eq!(tree.height(), None);
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.to_string(), "");
    }

    #[test]
    fn test_first_insert_creates_leaf_root() {
        let mut tree = BTree::new(3).expect("create tree");
        assert!(tree.insert(42));

        assert_eq!(tree.snapshot(), Some(NodeView::leaf(vec![42])));
        assert_eq!(tree.height(), Some(0));
        assert!(tree.last_events().is_empty());
    }

    #[test]
    fn test_root_split_records_event() {
        let mut tree = tree_with(2, &[1, 2, 3]);
        assert!(tree.insert(4));

        assert_eq!(tree.last_events(), &[StructuralEvent::RootSplit { median: 2 }]);
        assert_eq!(
            tree.snapshot(),
            Some(NodeView::internal(
                vec![2],
                vec![NodeView::leaf(vec![1]), NodeView::leaf(vec![3, 4])],
            ))
        );
    }

    #[test]
    fn test_duplicate_insert_leaves_structure_untouched() {
        // Root is full: a careless insert would split it before noticing the duplicate
        let mut tree = tree_with(3, &[1, 2, 3, 4, 5]);
        let before = tree.snapshot();

        assert!(!tree.insert(3));

        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.total_keys(), 5);
        assert!(tree.last_events().is_empty());
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let mut tree = tree_with(3, &[10, 20, 5]);
        assert!(!tree.delete(99));
        assert_eq!(tree.total_keys(), 3);

        let mut empty = BTree::new(3).expect("create tree");
        assert!(!empty.delete(1));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_delete_absent_key_never_rebalances() {
        // [2] over [1] and [3]: both children are minimal for t=2
        let mut tree = tree_with(2, &[1, 2, 3, 4]);
        assert!(tree.delete(4));
        let before = tree.snapshot();
        assert_eq!(tree.height(), Some(1));

        assert!(!tree.delete(99));
        assert!(!tree.delete(0));

        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.height(), Some(1));
        assert!(tree.last_events().is_empty());
    }

    #[test]
    fn test_delete_last_key_empties_tree() {
        let mut tree = tree_with(3, &[7]);
        assert!(tree.delete(7));

        assert!(tree.is_empty());
        assert_eq!(tree.snapshot(), None);
        assert_eq!(tree.height(), None);
        assert!(tree.last_events().is_empty());
    }

    #[test]
    fn test_root_collapse_records_event() {
        // [2] over [1] and [3, 4]
        let mut tree = tree_with(2, &[1, 2, 3, 4]);
        assert!(tree.delete(4));
        assert!(tree.last_events().is_empty());
        assert_eq!(tree.height(), Some(1));

        // Both children are minimal now, so descending for 1 merges them
        assert!(tree.delete(1));

        assert_eq!(tree.height(), Some(0));
        assert_eq!(
            tree.last_events(),
            &[
                StructuralEvent::Merge { separator: 2 },
                StructuralEvent::RootCollapse
            ]
        );
        assert_eq!(tree.snapshot(), Some(NodeView::leaf(vec![2, 3])));
    }

    #[test]
    fn test_iter_and_display_in_order() {
        let tree = tree_with(2, &[50, 10, 40, 20, 30, 60, 0]);
        let keys: Vec<Key> = tree.iter().collect();
        assert_eq!(keys, vec![0, 10, 20, 30, 40, 50, 60]);
        assert_eq!(tree.to_string(), "0 10 20 30 40 50 60");

        let via_into_iter: Vec<Key> = (&tree).into_iter().collect();
        assert_eq!(via_into_iter, keys);
    }

    #[test]
    fn test_stats() {
        let tree = tree_with(2, &[1, 2, 3, 4]);
        assert_eq!(
            tree.stats(),
            TreeStats {
                total_keys: 4,
                height: Some(1),
                node_count: 3,
                leaf_count: 2,
                min_degree: 2,
            }
        );
    }

    #[test]
    fn test_clear() {
        let mut tree = tree_with(3, &[1, 2, 3]);
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.insert(2));
        assert_eq!(tree.total_keys(), 1);
    }

    #[test]
    fn test_with_config() {
        let config = EngineConfig {
            min_degree: 4,
            ..EngineConfig::default()
        };
        let tree = BTree::with_config(&config).expect("create tree");
        assert_eq!(tree.min_degree(), 4);
    }
}
