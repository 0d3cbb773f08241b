//! B-tree node type and the node-local halves of insertion and deletion.
//!
//! Nodes own their children directly. Splits, borrows and merges move keys and
//! whole subtrees between vectors, so no node is ever shared or back-linked.

use std::cmp::Ordering;

use tracing::trace;

use crate::btree::event::StructuralEvent;
use crate::btree::view::NodeView;

/// Key stored in the tree.
pub type Key = i64;

/// A B-tree node.
///
/// Stores N keys and, unless it is a leaf, N+1 children.
/// `children[i]` contains keys < `keys[i]`
/// `children[i+1]` contains keys > `keys[i]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    /// Keys in strictly increasing order.
    pub(crate) keys: Vec<Key>,
    /// Child nodes. Empty for a leaf, `keys.len() + 1` entries otherwise.
    pub(crate) children: Vec<Self>,
}

impl Node {
    /// Create an empty leaf.
    #[must_use]
    pub(crate) const fn new_leaf() -> Self {
        Self {
            keys: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create a key-less internal node whose only child is `child`.
    ///
    /// Used when the root splits: the old root becomes child 0 of the new one.
    #[must_use]
    pub(crate) fn with_only_child(child: Self) -> Self {
        Self {
            keys: Vec::new(),
            children: vec![child],
        }
    }

    #[must_use]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check if the node holds the maximum `2t-1` keys.
    #[must_use]
    pub(crate) fn is_full(&self, min_degree: usize) -> bool {
        self.keys.len() >= 2 * min_degree - 1
    }

    /// Binary search for `key` within this node.
    ///
    /// `Ok(i)` is an exact match at `keys[i]`; `Err(i)` is the index of the
    /// first key greater than `key`, which is also the child to descend into.
    pub(crate) fn find_index(&self, key: Key) -> Result<usize, usize> {
        self.keys.binary_search(&key)
    }

    /// Check whether `key` is stored anywhere in this subtree.
    #[must_use]
    pub(crate) fn contains(&self, key: Key) -> bool {
        let mut node = self;
        loop {
            match node.find_index(key) {
                Ok(_) => return true,
                Err(idx) => match node.children.get(idx) {
                    Some(child) => node = child,
                    None => return false,
                },
            }
        }
    }

    /// Insert `key` into this subtree, splitting full children on the way down.
    ///
    /// Pre-condition: this node is not full.
    /// Returns `false` if the key was already present.
    pub(crate) fn insert_non_full(
        &mut self,
        key: Key,
        min_degree: usize,
        events: &mut Vec<StructuralEvent>,
    ) -> bool {
        let mut idx = match self.find_index(key) {
            Ok(_) => return false,
            Err(idx) => idx,
        };

        if self.is_leaf() {
            self.keys.insert(idx, key);
            return true;
        }

        if self.children[idx].is_full(min_degree) {
            let median = self.split_child(idx, min_degree);
            events.push(StructuralEvent::Split { median });

            // The promoted median now sits at keys[idx]; pick the half that
            // covers the new key.
            match key.cmp(&median) {
                Ordering::Greater => idx += 1,
                Ordering::Equal => return false,
                Ordering::Less => {}
            }
        }

        self.children[idx].insert_non_full(key, min_degree, events)
    }

    /// Split the full child at `idx` and promote its median into this node.
    ///
    /// Pre-condition: this node is not full and `children[idx]` holds `2t-1` keys.
    /// Post-condition: `children[idx]` and `children[idx + 1]` hold `t-1` keys each.
    /// Returns the promoted median.
    pub(crate) fn split_child(&mut self, idx: usize, min_degree: usize) -> Key {
        let child = &mut self.children[idx];
        let median = child.keys[min_degree - 1];

        // Right node gets the keys and children after the median
        let right_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(min_degree)
        };
        let right = Self {
            keys: child.keys.split_off(min_degree),
            children: right_children,
        };

        // Drop the median from the left node
        child.keys.truncate(min_degree - 1);

        self.keys.insert(idx, median);
        self.children.insert(idx + 1, right);

        trace!(median, "split child {idx}");
        median
    }

    /// Remove `key` from this subtree in a single downward pass.
    ///
    /// Every child is topped up to at least `t` keys before the pass descends
    /// into it, so removal never has to walk back up.
    ///
    /// Pre-condition: this node is the root or holds at least `t` keys.
    /// Returns `false` if the key was not present.
    pub(crate) fn remove(
        &mut self,
        key: Key,
        min_degree: usize,
        events: &mut Vec<StructuralEvent>,
    ) -> bool {
        match self.find_index(key) {
            Ok(idx) if self.is_leaf() => {
                self.keys.remove(idx);
                true
            }
            Ok(idx) => self.remove_from_internal(idx, key, min_degree, events),
            Err(_) if self.is_leaf() => false,
            Err(idx) => {
                let idx = self.ensure_child_has_spare(idx, min_degree, events);
                self.children[idx].remove(key, min_degree, events)
            }
        }
    }

    /// Remove `keys[idx]` (equal to `key`) from this internal node.
    fn remove_from_internal(
        &mut self,
        idx: usize,
        key: Key,
        min_degree: usize,
        events: &mut Vec<StructuralEvent>,
    ) -> bool {
        if self.children[idx].keys.len() >= min_degree
            && let Some(predecessor) = self.children[idx].max_key()
        {
            self.keys[idx] = predecessor;
            return self.children[idx].remove(predecessor, min_degree, events);
        }

        if self.children[idx + 1].keys.len() >= min_degree
            && let Some(successor) = self.children[idx + 1].min_key()
        {
            self.keys[idx] = successor;
            return self.children[idx + 1].remove(successor, min_degree, events);
        }

        // Both neighbours are minimal: fold the key down into a merged child
        self.merge_children(idx, events);
        self.children[idx].remove(key, min_degree, events)
    }

    /// Make sure `children[idx]` holds at least `t` keys before descending.
    ///
    /// Borrows from a sibling with a spare key when one exists, otherwise
    /// merges with a sibling. Returns the index of the child that now covers
    /// the original child's key range (a merge with the left sibling shifts
    /// it one position to the left).
    fn ensure_child_has_spare(
        &mut self,
        idx: usize,
        min_degree: usize,
        events: &mut Vec<StructuralEvent>,
    ) -> usize {
        if self.children[idx].keys.len() >= min_degree {
            return idx;
        }

        let has_right = idx < self.keys.len();

        if idx > 0 && self.children[idx - 1].keys.len() >= min_degree {
            self.borrow_from_left(idx, events);
            idx
        } else if has_right && self.children[idx + 1].keys.len() >= min_degree {
            self.borrow_from_right(idx, events);
            idx
        } else if has_right {
            self.merge_children(idx, events);
            idx
        } else {
            self.merge_children(idx - 1, events);
            idx - 1
        }
    }

    /// Rotate the left sibling's last key up and the separator down into
    /// `children[idx]`.
    fn borrow_from_left(&mut self, idx: usize, events: &mut Vec<StructuralEvent>) {
        let (before, after) = self.children.split_at_mut(idx);
        let left = &mut before[idx - 1];
        let child = &mut after[0];

        let Some(moved_up) = left.keys.pop() else {
            return;
        };
        let moved_down = std::mem::replace(&mut self.keys[idx - 1], moved_up);
        child.keys.insert(0, moved_down);

        if let Some(grandchild) = left.children.pop() {
            child.children.insert(0, grandchild);
        }

        trace!(moved_up, moved_down, "borrowed from left sibling");
        events.push(StructuralEvent::BorrowFromLeft {
            moved_up,
            moved_down,
        });
    }

    /// Rotate the right sibling's first key up and the separator down into
    /// `children[idx]`.
    fn borrow_from_right(&mut self, idx: usize, events: &mut Vec<StructuralEvent>) {
        let (before, after) = self.children.split_at_mut(idx + 1);
        let child = &mut before[idx];
        let right = &mut after[0];

        if right.keys.is_empty() {
            return;
        }
        let moved_up = right.keys.remove(0);
        let moved_down = std::mem::replace(&mut self.keys[idx], moved_up);
        child.keys.push(moved_down);

        if !right.is_leaf() {
            child.children.push(right.children.remove(0));
        }

        trace!(moved_up, moved_down, "borrowed from right sibling");
        events.push(StructuralEvent::BorrowFromRight {
            moved_up,
            moved_down,
        });
    }

    /// Merge `children[idx + 1]` and the separator `keys[idx]` into `children[idx]`.
    fn merge_children(&mut self, idx: usize, events: &mut Vec<StructuralEvent>) {
        let separator = self.keys.remove(idx);
        let right = self.children.remove(idx + 1);

        let left = &mut self.children[idx];
        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);

        trace!(separator, "merged children {idx} and {}", idx + 1);
        events.push(StructuralEvent::Merge { separator });
    }

    /// Largest key in this subtree.
    fn max_key(&self) -> Option<Key> {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child;
        }
        node.keys.last().copied()
    }

    /// Smallest key in this subtree.
    fn min_key(&self) -> Option<Key> {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child;
        }
        node.keys.first().copied()
    }

    /// Total number of keys in this subtree.
    #[must_use]
    pub(crate) fn count_keys(&self) -> usize {
        self.keys.len() + self.children.iter().map(Self::count_keys).sum::<usize>()
    }

    /// Total number of nodes in this subtree, this one included.
    #[must_use]
    pub(crate) fn count_nodes(&self) -> usize {
        1 + self.children.iter().map(Self::count_nodes).sum::<usize>()
    }

    #[must_use]
    pub(crate) fn count_leaves(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Self::count_leaves).sum()
        }
    }

    /// Number of edges from this node down to its leaves.
    ///
    /// All leaves sit at the same depth, so following the first child suffices.
    #[must_use]
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 0;
        let mut node = self;
        while let Some(child) = node.children.first() {
            depth += 1;
            node = child;
        }
        depth
    }

    /// Deep-copy this subtree into a read-only view.
    #[must_use]
    pub(crate) fn view(&self) -> NodeView {
        NodeView {
            keys: self.keys.clone(),
            is_leaf: self.is_leaf(),
            children: self.children.iter().map(Self::view).collect(),
        }
    }
}
