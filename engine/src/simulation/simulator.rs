//! Main simulator harness for deterministic simulation testing.
//!
//! This module ties together the operation generator, the engine, a
//! `BTreeSet` model and the invariant checker.

use std::collections::BTreeSet;

use tracing::trace;

use super::invariants::{InvariantChecker, InvariantViolation};
use super::op_gen::{Operation, OperationGenConfig, OperationGenerator};
use crate::btree::{BTree, BTreeError, DEFAULT_MIN_DEGREE, Key};
use crate::config::EngineConfig;

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Minimum degree of the simulated tree.
    pub min_degree: usize,
    /// Operation generation configuration.
    pub operation_config: OperationGenConfig,
    /// Run the full structural check every this many operations (0 = only at the end).
    pub structure_check_interval: usize,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            min_degree: DEFAULT_MIN_DEGREE,
            operation_config: OperationGenConfig::default(),
            structure_check_interval: 1,
        }
    }

    /// Build a simulator config from the engine configuration.
    #[must_use]
    pub fn from_engine_config(config: &EngineConfig) -> Self {
        Self::new(config.simulation_seed).with_min_degree(config.min_degree)
    }

    /// Set the minimum degree.
    #[must_use]
    pub const fn with_min_degree(mut self, min_degree: usize) -> Self {
        self.min_degree = min_degree;
        self
    }

    /// Set the operation configuration.
    #[must_use]
    pub const fn with_operation_config(mut self, config: OperationGenConfig) -> Self {
        self.operation_config = config;
        self
    }

    /// Set how often the full structural check runs.
    #[must_use]
    pub const fn with_structure_check_interval(mut self, interval: usize) -> Self {
        self.structure_check_interval = interval;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations applied.
    pub operations_processed: usize,
    /// Inserts that added a new key.
    pub inserts: usize,
    /// Inserts ignored as duplicates.
    pub duplicate_inserts: usize,
    /// Deletes that removed a key.
    pub deletes: usize,
    /// Deletes of absent keys.
    pub absent_deletes: usize,
    /// Searches performed.
    pub searches: usize,
    /// Keys in the tree at the end of the run.
    pub final_total_keys: usize,
    /// Height of the tree at the end of the run.
    pub final_height: Option<usize>,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: OperationGenerator,
    checker: InvariantChecker,
    tree: BTree,
    /// Keys the tree should hold.
    model: BTreeSet<Key>,
    operations_processed: usize,
    inserts: usize,
    duplicate_inserts: usize,
    deletes: usize,
    absent_deletes: usize,
    searches: usize,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured minimum degree is invalid.
    pub fn new(config: SimulatorConfig) -> Result<Self, BTreeError> {
        let tree = BTree::new(config.min_degree)?;
        let generator = OperationGenerator::with_config(config.seed, config.operation_config.clone());

        Ok(Self {
            config,
            generator,
            checker: InvariantChecker::new(),
            tree,
            model: BTreeSet::new(),
            operations_processed: 0,
            inserts: 0,
            duplicate_inserts: 0,
            deletes: 0,
            absent_deletes: 0,
            searches: 0,
        })
    }

    /// Apply `operation_count` generated operations and check invariants.
    ///
    /// Can be called repeatedly; each call continues from the current state.
    pub fn run(&mut self, operation_count: usize) -> SimulationResult {
        for _ in 0..operation_count {
            let operation = self.generator.next_operation();
            self.apply(operation);

            let interval = self.config.structure_check_interval;
            if interval > 0 && self.operations_processed.is_multiple_of(interval) {
                self.check_all();
            }
        }

        self.check_all();

        SimulationResult {
            seed: self.config.seed,
            operations_processed: self.operations_processed,
            inserts: self.inserts,
            duplicate_inserts: self.duplicate_inserts,
            deletes: self.deletes,
            absent_deletes: self.absent_deletes,
            searches: self.searches,
            final_total_keys: self.tree.total_keys(),
            final_height: self.tree.height(),
            invariant_violations: self.checker.violations().to_vec(),
        }
    }

    /// Apply one operation to both the engine and the model.
    pub fn apply(&mut self, operation: Operation) {
        let operation_index = self.operations_processed;
        self.operations_processed += 1;
        trace!(?operation, operation_index, "applying operation");

        match operation {
            Operation::Insert(key) => {
                let height_before = self.tree.height();
                let inserted = self.tree.insert(key);
                let expected = self.model.insert(key);

                if inserted {
                    self.inserts += 1;
                } else {
                    self.duplicate_inserts += 1;
                }
                self.expect_outcome("insert", key, inserted, expected, operation_index);

                if self.tree.height() < height_before {
                    self.checker.add_violation(InvariantViolation {
                        description: "Height decreased on insert".to_string(),
                        operation_index,
                        context: format!(
                            "key {key}: {height_before:?} -> {:?}",
                            self.tree.height()
                        ),
                    });
                }
            }
            Operation::Delete(key) => {
                let removed = self.tree.delete(key);
                let expected = self.model.remove(&key);

                if removed {
                    self.deletes += 1;
                } else {
                    self.absent_deletes += 1;
                }
                self.expect_outcome("delete", key, removed, expected, operation_index);
            }
            Operation::Search(key) => {
                self.searches += 1;
                let found = self.tree.search(key);
                let expected = self.model.contains(&key);
                self.expect_outcome("search", key, found, expected, operation_index);
            }
        }
    }

    fn expect_outcome(
        &mut self,
        operation: &str,
        key: Key,
        actual: bool,
        expected: bool,
        operation_index: usize,
    ) {
        if actual != expected {
            self.checker.add_violation(InvariantViolation {
                description: format!("Unexpected {operation} result"),
                operation_index,
                context: format!("key {key}: engine returned {actual}, model expects {expected}"),
            });
        }
    }

    fn check_all(&mut self) {
        let operation_index = self.operations_processed.saturating_sub(1);
        self.checker.check_tree(&self.tree, operation_index);
        self.checker
            .check_against_model(&self.tree, &self.model, operation_index);
    }

    /// Get the simulated tree.
    #[must_use]
    pub const fn tree(&self) -> &BTree {
        &self.tree
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
}
