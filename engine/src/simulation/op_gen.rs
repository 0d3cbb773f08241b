//! Operation generator for deterministic simulation testing.
//!
//! Keys are drawn from a bounded key space so the same keys come back
//! often, which exercises duplicate inserts and deletes of absent keys.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::btree::Key;

/// Configuration for operation generation.
#[derive(Debug, Clone)]
pub struct OperationGenConfig {
    /// Probability of generating an insert (0.0 - 1.0).
    pub insert_rate: f64,
    /// Probability of generating a delete (0.0 - 1.0). The rest are searches.
    pub delete_rate: f64,
    /// Keys are drawn uniformly from `0..key_space`.
    pub key_space: Key,
}

impl Default for OperationGenConfig {
    fn default() -> Self {
        Self {
            insert_rate: 0.5,
            delete_rate: 0.3,
            key_space: 500,
        }
    }
}

/// A single engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert(Key),
    Delete(Key),
    Search(Key),
}

/// Generator for random operations.
///
/// Produces the same sequence for the same seed and configuration.
pub struct OperationGenerator {
    rng: StdRng,
    config: OperationGenConfig,
}

impl OperationGenerator {
    /// Create a new generator with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, OperationGenConfig::default())
    }

    /// Create a new generator with custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: OperationGenConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Generate the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let key = self.rng.random_range(0..self.config.key_space.max(1));
        let roll: f64 = self.rng.random();

        if roll < self.config.insert_rate {
            Operation::Insert(key)
        } else if roll < self.config.insert_rate + self.config.delete_rate {
            Operation::Delete(key)
        } else {
            Operation::Search(key)
        }
    }
}

impl Iterator for OperationGenerator {
    type Item = Operation;

    fn next(&mut self) -> Option<Operation> {
        Some(self.next_operation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let first: Vec<Operation> = OperationGenerator::new(42).take(100).collect();
        let second: Vec<Operation> = OperationGenerator::new(42).take(100).collect();
        assert_eq!(first, second);

        let other: Vec<Operation> = OperationGenerator::new(43).take(100).collect();
        assert_ne!(first, other);
    }

    #[test]
    fn test_keys_stay_in_key_space() {
        let config = OperationGenConfig {
            key_space: 10,
            ..OperationGenConfig::default()
        };
        for op in OperationGenerator::with_config(7, config).take(500) {
            let (Operation::Insert(key) | Operation::Delete(key) | Operation::Search(key)) = op;
            assert!((0..10).contains(&key), "key {key} out of range");
        }
    }

    #[test]
    fn test_rates_select_operation_kind() {
        let inserts_only = OperationGenConfig {
            insert_rate: 1.0,
            delete_rate: 0.0,
            key_space: 100,
        };
        assert!(
            OperationGenerator::with_config(1, inserts_only)
                .take(200)
                .all(|op| matches!(op, Operation::Insert(_)))
        );

        let searches_only = OperationGenConfig {
            insert_rate: 0.0,
            delete_rate: 0.0,
            key_space: 100,
        };
        assert!(
            OperationGenerator::with_config(1, searches_only)
                .take(200)
                .all(|op| matches!(op, Operation::Search(_)))
        );
    }

    #[test]
    fn test_mixed_rates_produce_every_kind() {
        let ops: Vec<Operation> = OperationGenerator::new(9).take(500).collect();
        assert!(ops.iter().any(|op| matches!(op, Operation::Insert(_))));
        assert!(ops.iter().any(|op| matches!(op, Operation::Delete(_))));
        assert!(ops.iter().any(|op| matches!(op, Operation::Search(_))));
    }
}
