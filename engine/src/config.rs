//! Engine configuration module.
//!
//! This module provides configuration loading for the engine and its
//! simulation runner from environment variables.
//!
//! # Environment Variables
//!
//! - `BTREE_MIN_DEGREE`: Minimum degree `t` of the tree (default: `3`, must be at least `2` and at most `usize::MAX / 2`)
//! - `BTREE_SIMULATION_SEED`: Seed for the simulation runner (default: `0`)
//! - `BTREE_SIMULATION_OPERATIONS`: Operations per simulation run (default: `10000`)
//!
//! # Invariants
//!
//! - `min_degree` is always within `MIN_ALLOWED_DEGREE..=MAX_ALLOWED_DEGREE`

use std::str::FromStr;

use crate::btree::{DEFAULT_MIN_DEGREE, MAX_ALLOWED_DEGREE, MIN_ALLOWED_DEGREE};

const MIN_DEGREE_VAR: &str = "BTREE_MIN_DEGREE";
const SIMULATION_SEED_VAR: &str = "BTREE_SIMULATION_SEED";
const SIMULATION_OPERATIONS_VAR: &str = "BTREE_SIMULATION_OPERATIONS";

/// Engine configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `from_lookup()`, `min_degree` is
/// valid for `BTree::new`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Minimum degree `t` of the tree.
    pub min_degree: usize,
    /// Seed for the deterministic simulation runner.
    pub simulation_seed: u64,
    /// Number of operations the simulation runner applies.
    pub simulation_operations: usize,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_degree: DEFAULT_MIN_DEGREE,
            simulation_seed: Self::DEFAULT_SIMULATION_SEED,
            simulation_operations: Self::DEFAULT_SIMULATION_OPERATIONS,
        }
    }
}

impl EngineConfig {
    /// Default simulation seed.
    pub const DEFAULT_SIMULATION_SEED: u64 = 0;
    /// Default number of simulated operations.
    pub const DEFAULT_SIMULATION_OPERATIONS: usize = 10_000;

    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or if
    /// `BTREE_MIN_DEGREE` is below 2 or above `MAX_ALLOWED_DEGREE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `lookup` returns the raw value of a variable, or `None` if it is unset.
    ///
    /// # Errors
    ///
    /// Same as [`EngineConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_degree = Self::load_min_degree(&lookup)?;
        let simulation_seed =
            parse_var(&lookup, SIMULATION_SEED_VAR, Self::DEFAULT_SIMULATION_SEED)?;
        let simulation_operations = parse_var(
            &lookup,
            SIMULATION_OPERATIONS_VAR,
            Self::DEFAULT_SIMULATION_OPERATIONS,
        )?;

        Ok(Self {
            min_degree,
            simulation_seed,
            simulation_operations,
        })
    }

    /// Load the minimum degree.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an integer or is out of range.
    fn load_min_degree<F>(lookup: &F) -> Result<usize, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min_degree: usize = parse_var(lookup, MIN_DEGREE_VAR, DEFAULT_MIN_DEGREE)?;

        if min_degree < MIN_ALLOWED_DEGREE {
            return Err(ConfigError::InvalidValue {
                name: MIN_DEGREE_VAR.to_string(),
                message: format!("must be at least {MIN_ALLOWED_DEGREE}, got {min_degree}"),
            });
        }

        if min_degree > MAX_ALLOWED_DEGREE {
            return Err(ConfigError::InvalidValue {
                name: MIN_DEGREE_VAR.to_string(),
                message: format!("must be at most {MAX_ALLOWED_DEGREE}, got {min_degree}"),
            });
        }

        Ok(min_degree)
    }
}

/// Parse a variable, returning `default` if it is unset.
fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a valid non-negative integer"),
            }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_values() {
        let config = EngineConfig::from_lookup(lookup_from(&[])).expect("load config");
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.min_degree, 3);
        assert_eq!(config.simulation_seed, 0);
        assert_eq!(config.simulation_operations, 10_000);
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("BTREE_MIN_DEGREE", "5"),
            ("BTREE_SIMULATION_SEED", "12345"),
            ("BTREE_SIMULATION_OPERATIONS", " 200 "),
        ]))
        .expect("load config");

        assert_eq!(config.min_degree, 5);
        assert_eq!(config.simulation_seed, 12345);
        assert_eq!(config.simulation_operations, 200);
    }

    #[test]
    fn test_min_degree_below_two_rejected() {
        let error = EngineConfig::from_lookup(lookup_from(&[("BTREE_MIN_DEGREE", "1")]))
            .expect_err("degree 1 must be rejected");
        assert_eq!(
            error.to_string(),
            "invalid value for BTREE_MIN_DEGREE: must be at least 2, got 1"
        );
    }

    #[test]
    fn test_min_degree_above_maximum_rejected() {
        let too_large = (MAX_ALLOWED_DEGREE + 1).to_string();
        let error =
            EngineConfig::from_lookup(lookup_from(&[("BTREE_MIN_DEGREE", too_large.as_str())]))
                .expect_err("degree past the maximum must be rejected");
        assert_eq!(
            error.to_string(),
            format!(
                "invalid value for BTREE_MIN_DEGREE: must be at most {MAX_ALLOWED_DEGREE}, got {too_large}"
            )
        );

        let largest = MAX_ALLOWED_DEGREE.to_string();
        let config =
            EngineConfig::from_lookup(lookup_from(&[("BTREE_MIN_DEGREE", largest.as_str())]))
                .expect("largest degree is accepted");
        assert_eq!(config.min_degree, MAX_ALLOWED_DEGREE);
    }

    #[test]
    fn test_non_numeric_rejected() {
        let error = EngineConfig::from_lookup(lookup_from(&[("BTREE_SIMULATION_SEED", "abc")]))
            .expect_err("non-numeric seed must be rejected");
        assert_eq!(
            error,
            ConfigError::InvalidValue {
                name: "BTREE_SIMULATION_SEED".to_string(),
                message: "'abc' is not a valid non-negative integer".to_string(),
            }
        );
    }
}
