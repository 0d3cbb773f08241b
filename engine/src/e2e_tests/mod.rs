//! End-to-end tests at the engine API level.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! to verify whole insert / delete / search / snapshot sequences.

#![cfg(test)]

mod helpers;

mod test_delete_scenarios;
mod test_determinism;
mod test_duplicates;
mod test_empty_tree;
mod test_insert_scenario;
mod test_properties;
mod test_sequential;
mod test_snapshot_shape;
