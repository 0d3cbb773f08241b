//! In-memory B-tree engine.
//!
//! This module provides a B-tree of fixed minimum degree `t` over integer
//! keys, plus a read-only snapshot of its structure for rendering.
//!
//! # Structure
//!
//! The B-tree consists of:
//! - Internal nodes: `k` keys and `k+1` owned children
//! - Leaf nodes: keys only
//!
//! Insertion splits full nodes on the way down and deletion tops up minimal
//! nodes on the way down, so every mutation is a single root-to-leaf pass.
//!
//! # Usage
//!
//! ```
//! use engine::btree::BTree;
//!
//! # fn main() -> Result<(), engine::btree::BTreeError> {
//! let mut tree = BTree::new(3)?;
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.search(6));
//! assert_eq!(tree.total_keys(), 8);
//! assert_eq!(tree.height(), Some(1));
//!
//! let root = tree.snapshot().expect("tree is not empty");
//! assert_eq!(root.keys, vec![10]);
//! # Ok(())
//! # }
//! ```

mod event;
mod node;
mod shared;
mod tree;
mod view;

pub use event::StructuralEvent;
pub use node::Key;
pub use shared::SharedBTree;
pub use tree::{BTree, BTreeError, DEFAULT_MIN_DEGREE, Keys, MAX_ALLOWED_DEGREE, MIN_ALLOWED_DEGREE, TreeStats};
pub use view::NodeView;
