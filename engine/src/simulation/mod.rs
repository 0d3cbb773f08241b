//! Deterministic Simulation Testing (DST) infrastructure.
//!
//! This module provides tools for testing the engine with:
//! - Reproducible random operation generation
//! - A `BTreeSet` model the engine is compared against
//! - Structural invariant checking after operations
//!
//! Given the same seed, execution is identical.
//!
//! # Usage
//!
//! ```
//! use engine::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345).with_min_degree(2);
//!
//! let mut sim = Simulator::new(config).expect("valid degree");
//! let result = sim.run(1000);
//!
//! assert!(result.invariant_violations.is_empty());
//! ```

mod invariants;
mod op_gen;
mod simulator;

pub use invariants::{InvariantChecker, InvariantViolation};
pub use op_gen::{Operation, OperationGenConfig, OperationGenerator};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
