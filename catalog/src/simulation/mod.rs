//! Deterministic Simulation Testing (DST) infrastructure.
//!
//! This module provides tools for testing the balanced index and the merge
//! sort with:
//! - Reproducible random workloads
//! - A `BTreeMap` model of the index
//! - Invariant checking after each operation
//! - A manual clock, so sort timings are exact
//!
//! Given the same seed, execution is identical.
//!
//! # Usage
//!
//! ```
//! use catalog::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345).with_key_space(64);
//!
//! let mut sim = Simulator::new(config);
//! let result = sim.run(1000);
//!
//! assert!(result.invariant_violations.is_empty());
//! ```

mod invariants;
mod simulator;
mod workload;

pub use invariants::{
    HistoryStats, InvariantChecker, InvariantViolation, OperationHistory, ShapeSnapshot,
    avl_height_bound,
};
pub use simulator::{SimulationResult, Simulator, SimulatorConfig};
pub use workload::{Operation, WorkloadConfig, WorkloadGenerator};
