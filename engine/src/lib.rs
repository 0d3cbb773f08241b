// Life of an operation:
// 1. The presentation layer validates its input and calls insert / delete / search
// 2. The engine runs a single root-to-leaf pass:
//     - insert splits full nodes on the way down
//     - delete borrows or merges on the way down so no node underflows
// 3. The presentation layer takes a snapshot and renders it, replaying
//    the structural events of the last mutation as animation steps
//
// System components:
//  - B-tree engine (`btree`)
//  - Environment configuration (`config`)
//  - Deterministic simulation harness (`simulation`)

pub mod btree;
pub mod config;
pub mod simulation;

mod e2e_tests;

pub use btree::{BTree, BTreeError, Key, NodeView, SharedBTree, StructuralEvent, TreeStats};
