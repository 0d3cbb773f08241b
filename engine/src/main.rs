#![cfg_attr(test, allow(clippy::disallowed_methods))]
// Forbid unwrap() in production code.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use engine::config::EngineConfig;
use engine::simulation::{Simulator, SimulatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: min_degree={}, simulation_seed={}, simulation_operations={}",
        config.min_degree,
        config.simulation_seed,
        config.simulation_operations
    );

    let mut simulator = match Simulator::new(SimulatorConfig::from_engine_config(&config)) {
        Ok(simulator) => simulator,
        Err(e) => {
            tracing::error!("Failed to create simulator: {e}");
            std::process::exit(1);
        }
    };

    let result = simulator.run(config.simulation_operations);

    tracing::info!(
        "Simulation finished: seed={}, operations={}, inserts={} (+{} duplicates), deletes={} (+{} absent), searches={}",
        result.seed,
        result.operations_processed,
        result.inserts,
        result.duplicate_inserts,
        result.deletes,
        result.absent_deletes,
        result.searches
    );
    tracing::info!(
        "Final tree: total_keys={}, height={:?}",
        result.final_total_keys,
        result.final_height
    );

    if !result.passed() {
        for violation in &result.invariant_violations {
            tracing::error!(
                "Invariant violation at operation {}: {} ({})",
                violation.operation_index,
                violation.description,
                violation.context
            );
        }
        std::process::exit(1);
    }
}
