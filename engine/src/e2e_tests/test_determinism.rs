//! Test that simulation runs are reproducible from their seed.

use crate::simulation::{Simulator, SimulatorConfig};

#[test]
fn test_same_seed_same_tree() {
    let run = |seed| {
        let config = SimulatorConfig::new(seed).with_min_degree(2);
        let mut simulator = Simulator::new(config).expect("simulator");
        let result = simulator.run(1000);
        assert!(result.passed(), "{:?}", result.invariant_violations);
        simulator.tree().snapshot()
    };

    assert_eq!(run(2024), run(2024));
    assert_ne!(run(2024), run(2025));
}

#[test]
fn test_runs_continue_from_current_state() {
    let mut split = Simulator::new(SimulatorConfig::new(5)).expect("simulator");
    split.run(400);
    let split_result = split.run(600);

    let mut whole = Simulator::new(SimulatorConfig::new(5)).expect("simulator");
    let whole_result = whole.run(1000);

    assert_eq!(split_result.operations_processed, 1000);
    assert_eq!(split_result.final_total_keys, whole_result.final_total_keys);
    assert_eq!(split.tree().snapshot(), whole.tree().snapshot());
}
