//! Read-only snapshot of the tree structure.
//!
//! A snapshot is a deep copy taken between mutations, so a renderer can hold
//! on to it without ever observing a half-split or half-merged node.

use serde::Serialize;

use crate::btree::node::Key;

/// Immutable copy of one node and its subtree.
///
/// Serializes as `{"keys": [...], "isLeaf": bool, "children": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    /// Keys in the order they are stored in the node.
    pub keys: Vec<Key>,
    pub is_leaf: bool,
    /// Child snapshots in order. Empty for leaves.
    pub children: Vec<Self>,
}

impl NodeView {
    /// Build a leaf view.
    #[must_use]
    pub const fn leaf(keys: Vec<Key>) -> Self {
        Self {
            keys,
            is_leaf: true,
            children: Vec::new(),
        }
    }

    /// Build an internal view.
    #[must_use]
    pub const fn internal(keys: Vec<Key>, children: Vec<Self>) -> Self {
        Self {
            keys,
            is_leaf: false,
            children,
        }
    }

    /// Total number of keys in this subtree.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len() + self.children.iter().map(Self::key_count).sum::<usize>()
    }

    /// Number of edges from this node down to its leftmost leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.children.first().map_or(0, |child| 1 + child.height())
    }

    /// All keys of this subtree in ascending order.
    #[must_use]
    pub fn keys_in_order(&self) -> Vec<Key> {
        let mut out = Vec::with_capacity(self.key_count());
        self.collect_in_order(&mut out);
        out
    }

    fn collect_in_order(&self, out: &mut Vec<Key>) {
        for (i, key) in self.keys.iter().enumerate() {
            if let Some(child) = self.children.get(i) {
                child.collect_in_order(out);
            }
            out.push(*key);
        }
        if let Some(last) = self.children.get(self.keys.len()) {
            last.collect_in_order(out);
        }
    }
}
