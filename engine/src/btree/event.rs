//! Structural events recorded while a mutation reshapes the tree.
//!
//! A presentation layer replays these as animation steps; the engine itself
//! never reads them back.

use serde::Serialize;

use crate::btree::node::Key;

/// A structural change caused by a single insert or delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum StructuralEvent {
    /// The full root was split and the tree grew by one level.
    RootSplit { median: Key },
    /// A full non-root node was split and its median promoted to the parent.
    Split { median: Key },
    /// A key rotated from the left sibling through the parent.
    BorrowFromLeft { moved_up: Key, moved_down: Key },
    /// A key rotated from the right sibling through the parent.
    BorrowFromRight { moved_up: Key, moved_down: Key },
    /// Two siblings were merged around the separator pulled down from their parent.
    Merge { separator: Key },
    /// The key-less root was replaced by its only child and the tree shrank by one level.
    RootCollapse,
}
