//! Main simulator harness for deterministic simulation testing.
//!
//! This module ties together the workload generator, the model and the
//! invariant checker, and drives a [`BalancedIndex`] and a [`MergeSort`] with
//! the generated operations.

use std::cell::Cell;
use std::time::Duration;

use crate::index::{BalancedIndex, RotationStats};
use crate::sort::{ManualClock, MergeSort, Sorter};

use super::invariants::{
    HistoryStats, InvariantChecker, InvariantViolation, OperationHistory, ShapeSnapshot,
};
use super::workload::{Operation, WorkloadConfig, WorkloadGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Workload generation configuration.
    pub workload_config: WorkloadConfig,
    /// Time the simulated clock advances per reading.
    pub clock_tick: Duration,
    /// Compare the full index against the model every this many operations.
    /// Zero compares only at the end of a run.
    pub full_check_interval: usize,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            workload_config: WorkloadConfig::default(),
            clock_tick: Duration::from_micros(1),
            full_check_interval: 64,
        }
    }

    /// Set the workload configuration.
    #[must_use]
    pub const fn with_workload_config(mut self, config: WorkloadConfig) -> Self {
        self.workload_config = config;
        self
    }

    /// Set the number of distinct index keys.
    #[must_use]
    pub const fn with_key_space(mut self, key_space: u32) -> Self {
        self.workload_config.key_space = key_space;
        self
    }

    /// Set the probability of a sort operation.
    #[must_use]
    pub const fn with_sort_rate(mut self, rate: f64) -> Self {
        self.workload_config.sort_rate = rate;
        self
    }

    /// Set how often the full index is compared against the model.
    #[must_use]
    pub const fn with_full_check_interval(mut self, interval: usize) -> Self {
        self.full_check_interval = interval;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// Number of operations processed.
    pub operations_processed: u64,
    /// Operation counts by kind.
    pub history: HistoryStats,
    /// Entries in the index at the end of the run.
    pub final_len: usize,
    /// Height of the index at the end of the run.
    pub final_height: u32,
    /// Rotations the index performed.
    pub rotations: RotationStats,
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
    generator: WorkloadGenerator,
    history: OperationHistory,
    checker: InvariantChecker,
    index: BalancedIndex<u32, u64>,
    sorter: MergeSort<ManualClock>,
    operations_processed: u64,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    #[must_use]
    pub fn new(config: SimulatorConfig) -> Self {
        let generator = WorkloadGenerator::with_config(config.seed, config.workload_config.clone());
        let sorter = MergeSort::with_clock(ManualClock::new(config.clock_tick));

        Self {
            config,
            generator,
            history: OperationHistory::new(),
            checker: InvariantChecker::new(),
            index: BalancedIndex::new(),
            sorter,
            operations_processed: 0,
        }
    }

    /// Run the simulation for a given number of operations.
    ///
    /// Invariants are checked after every operation. The simulator keeps its
    /// index between calls, so consecutive runs continue the same workload.
    pub fn run(&mut self, operation_count: usize) -> SimulationResult {
        for _ in 0..operation_count {
            let operation = self.generator.next_operation();
            let operation_index = usize::try_from(self.operations_processed).unwrap_or(usize::MAX);
            self.apply(operation, operation_index);
            self.operations_processed += 1;

            let interval = self.config.full_check_interval;
            if interval > 0 && (operation_index + 1) % interval == 0 {
                self.checker
                    .check_contents(&self.index, &self.history, operation_index);
            }
        }

        let last_index = usize::try_from(self.operations_processed).unwrap_or(usize::MAX);
        self.checker
            .check_contents(&self.index, &self.history, last_index);

        let result = SimulationResult {
            seed: self.config.seed,
            operations_processed: self.operations_processed,
            history: self.history.stats(),
            final_len: self.index.len(),
            final_height: self.index.height(),
            rotations: self.index.rotation_stats(),
            invariant_violations: self.checker.violations().to_vec(),
        };

        if result.passed() {
            tracing::debug!(
                seed = result.seed,
                operations = result.operations_processed,
                height = result.final_height,
                "simulation passed"
            );
        } else {
            tracing::warn!(
                seed = result.seed,
                violations = result.invariant_violations.len(),
                "simulation found invariant violations"
            );
        }
        result
    }

    fn apply(&mut self, operation: Operation, operation_index: usize) {
        match operation {
            Operation::Insert { key, value } => {
                let before = ShapeSnapshot::of(&self.index);
                let returned = self.index.insert(key, value);
                let expected_previous = self.history.record_insert(key, value);
                self.checker.check_insert(
                    &self.index,
                    returned,
                    expected_previous,
                    before,
                    operation_index,
                );
                self.checker.check_structure(&self.index, operation_index);
            }
            Operation::Search { key } => {
                let found = self.index.search(&key).copied();
                self.history.record_search();
                self.checker
                    .check_search(key, found, self.history.expected(key), operation_index);
            }
            Operation::Sort { input } => {
                let mut output = input.clone();
                let comparisons = Cell::new(0usize);
                let elapsed = self.sorter.sort(&mut output, |a, b| {
                    comparisons.set(comparisons.get() + 1);
                    a.0.cmp(&b.0)
                });
                self.history.record_sort();

                let expected_elapsed = if input.len() > 1 {
                    self.config.clock_tick
                } else {
                    Duration::ZERO
                };
                self.checker.check_sort(
                    &input,
                    &output,
                    elapsed,
                    expected_elapsed,
                    operation_index,
                );
                self.checker
                    .check_comparisons(input.len(), comparisons.get(), operation_index);
            }
        }
    }

    /// The index under test.
    #[must_use]
    pub const fn index(&self) -> &BalancedIndex<u32, u64> {
        &self.index
    }

    /// Get the operation history.
    #[must_use]
    pub const fn history(&self) -> &OperationHistory {
        &self.history
    }

    /// Get the invariant checker.
    #[must_use]
    pub const fn checker(&self) -> &InvariantChecker {
        &self.checker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_basic() {
        let mut simulator = Simulator::new(SimulatorConfig::new(12345));

        let result = simulator.run(500);

        assert_eq!(result.operations_processed, 500);
        let stats = result.history;
        assert_eq!(
            stats.inserts + stats.updates + stats.searches + stats.sorts,
            500
        );
        assert_eq!(result.final_len, stats.unique_keys);
        assert!(
            result.passed(),
            "Simulation should pass: {:?}",
            result.invariant_violations
        );
    }

    #[test]
    fn test_simulator_deterministic() {
        let mut sim1 = Simulator::new(SimulatorConfig::new(777));
        let result1 = sim1.run(300);

        let mut sim2 = Simulator::new(SimulatorConfig::new(777));
        let result2 = sim2.run(300);

        assert_eq!(result1.history, result2.history);
        assert_eq!(result1.final_height, result2.final_height);
        assert_eq!(result1.rotations, result2.rotations);
    }

    #[test]
    fn test_small_key_space_forces_updates() {
        let config = SimulatorConfig::new(5).with_key_space(8);
        let mut simulator = Simulator::new(config);

        let result = simulator.run(400);

        assert!(result.passed(), "{:?}", result.invariant_violations);
        assert!(result.history.updates > 0);
        assert!(result.final_len <= 8);
    }

    #[test]
    fn test_sort_heavy_workload() {
        let config = SimulatorConfig::new(31).with_sort_rate(0.5);
        let mut simulator = Simulator::new(config);

        let result = simulator.run(200);

        assert!(result.passed(), "{:?}", result.invariant_violations);
        assert!(result.history.sorts > 0);
    }

    #[test]
    fn test_runs_continue_the_same_index() {
        let mut simulator = Simulator::new(SimulatorConfig::new(99));

        let first = simulator.run(100);
        let second = simulator.run(100);

        assert_eq!(second.operations_processed, 200);
        assert!(second.final_len >= first.final_len);
        assert!(second.passed());
        assert_eq!(simulator.index().len(), second.final_len);
    }

    #[test]
    fn test_many_seeds() {
        for seed in 0..32 {
            let config = SimulatorConfig::new(seed)
                .with_key_space(256)
                .with_full_check_interval(0);
            let mut simulator = Simulator::new(config);

            let result = simulator.run(400);

            assert!(
                result.passed(),
                "seed {seed} failed: {:?}",
                result.invariant_violations
            );
        }
    }

    #[test]
    #[ignore] // Long running test
    fn test_simulator_stress() {
        let config = SimulatorConfig::new(99999).with_key_space(100_000);
        let mut simulator = Simulator::new(config);

        let result = simulator.run(50_000);

        assert!(result.passed());
    }
}
