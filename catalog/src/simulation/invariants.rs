//! Invariant checking for deterministic simulation testing.
//!
//! This module records what the index should contain and verifies, after each
//! operation, that the index and the sorter behaved as expected.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::index::{BalancedIndex, RotationStats};

/// Tracks the expected contents of the index.
#[derive(Debug, Default)]
pub struct OperationHistory {
    /// Model of the index: key -> latest value.
    expected_state: BTreeMap<u32, u64>,
    /// Number of inserts that created a key.
    inserts: u64,
    /// Number of inserts that replaced a value.
    updates: u64,
    /// Number of searches.
    searches: u64,
    /// Number of sorts.
    sorts: u64,
}

impl OperationHistory {
    /// Create a new empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an insert. Returns the value the model held for `key`, if any.
    pub fn record_insert(&mut self, key: u32, value: u64) -> Option<u64> {
        let previous = self.expected_state.insert(key, value);
        if previous.is_some() {
            self.updates += 1;
        } else {
            self.inserts += 1;
        }
        previous
    }

    /// Record a search.
    pub const fn record_search(&mut self) {
        self.searches += 1;
    }

    /// Record a sort.
    pub const fn record_sort(&mut self) {
        self.sorts += 1;
    }

    /// The value the model holds for `key`.
    #[must_use]
    pub fn expected(&self, key: u32) -> Option<u64> {
        self.expected_state.get(&key).copied()
    }

    /// Get statistics.
    #[must_use]
    pub fn stats(&self) -> HistoryStats {
        HistoryStats {
            inserts: self.inserts,
            updates: self.updates,
            searches: self.searches,
            sorts: self.sorts,
            unique_keys: self.expected_state.len(),
        }
    }

    /// Get the expected state (for verification).
    #[must_use]
    pub const fn expected_state(&self) -> &BTreeMap<u32, u64> {
        &self.expected_state
    }
}

/// Statistics about the operation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStats {
    /// Inserts that created a key.
    pub inserts: u64,
    /// Inserts that replaced a value.
    pub updates: u64,
    /// Searches.
    pub searches: u64,
    /// Sorts.
    pub sorts: u64,
    /// Distinct keys in the model.
    pub unique_keys: usize,
}

/// An invariant violation detected during simulation.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violation.
    pub description: String,
    /// Operation index where it was detected.
    pub operation_index: usize,
    /// Additional context.
    pub context: String,
}

/// Shape of the index just before an operation.
#[derive(Debug, Clone, Copy)]
pub struct ShapeSnapshot {
    /// Tree height.
    pub height: u32,
    /// Rotation counters.
    pub rotations: RotationStats,
}

impl ShapeSnapshot {
    /// Capture the current shape of `index`.
    #[must_use]
    pub fn of<K, V>(index: &BalancedIndex<K, V>) -> Self {
        Self {
            height: index.height(),
            rotations: index.rotation_stats(),
        }
    }
}

/// Checker for index and sort invariants.
#[derive(Debug, Default)]
pub struct InvariantChecker {
    /// Detected violations.
    violations: Vec<InvariantViolation>,
}

impl InvariantChecker {
    /// Create a new invariant checker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    /// Take ownership of the recorded violations, leaving none behind.
    pub fn take_violations(&mut self) -> Vec<InvariantViolation> {
        std::mem::take(&mut self.violations)
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    fn violation(&mut self, description: &str, operation_index: usize, context: String) {
        self.violations.push(InvariantViolation {
            description: description.to_string(),
            operation_index,
            context,
        });
    }

    /// Check the tree's structural invariants and its height bound.
    pub fn check_structure(&mut self, index: &BalancedIndex<u32, u64>, operation_index: usize) {
        if let Err(e) = index.check_invariants() {
            self.violation("Index structure broken", operation_index, e.to_string());
        }

        let len = index.len();
        let height = index.height();
        let bound = avl_height_bound(len);
        if height > bound {
            self.violation(
                "Index taller than the AVL bound",
                operation_index,
                format!("height {height} > bound {bound} for {len} entries"),
            );
        }
    }

    /// Check the outcome of an insert against the model.
    ///
    /// An insert of an existing key must return the model's previous value
    /// and leave the tree's shape untouched.
    pub fn check_insert(
        &mut self,
        index: &BalancedIndex<u32, u64>,
        returned: Option<u64>,
        expected_previous: Option<u64>,
        before: ShapeSnapshot,
        operation_index: usize,
    ) {
        if returned != expected_previous {
            self.violation(
                "Insert returned the wrong previous value",
                operation_index,
                format!("returned {returned:?}, expected {expected_previous:?}"),
            );
        }

        if expected_previous.is_some() {
            let after = ShapeSnapshot::of(index);
            if after.rotations != before.rotations || after.height != before.height {
                self.violation(
                    "Value update changed the tree's shape",
                    operation_index,
                    format!("before {before:?}, after {after:?}"),
                );
            }
        }
    }

    /// Check a search result against the model.
    pub fn check_search(
        &mut self,
        key: u32,
        found: Option<u64>,
        expected: Option<u64>,
        operation_index: usize,
    ) {
        if found != expected {
            self.violation(
                "Search disagrees with model",
                operation_index,
                format!("key {key}: found {found:?}, expected {expected:?}"),
            );
        }
    }

    /// Check that a sort produced the stable ordering of its input.
    ///
    /// The reference is the standard library's stable sort, so this covers
    /// length, element multiset, ordering and stability at once.
    pub fn check_sort(
        &mut self,
        input: &[(u8, usize)],
        output: &[(u8, usize)],
        elapsed: Duration,
        expected_elapsed: Duration,
        operation_index: usize,
    ) {
        let mut expected = input.to_vec();
        expected.sort_by_key(|&(key, _)| key);

        if output != expected.as_slice() {
            self.violation(
                "Sort output is not the stable ordering of its input",
                operation_index,
                format!("input {input:?}, output {output:?}"),
            );
        }

        if elapsed != expected_elapsed {
            self.violation(
                "Sort reported unexpected elapsed time",
                operation_index,
                format!("reported {elapsed:?}, expected {expected_elapsed:?}"),
            );
        }
    }

    /// Check that sorting `len` elements used at most `len * ceil(log2 len)`
    /// comparisons.
    pub fn check_comparisons(&mut self, len: usize, comparisons: usize, operation_index: usize) {
        let bound = if len <= 1 {
            0
        } else {
            let ceil_log2 = usize::BITS - (len - 1).leading_zeros();
            len.saturating_mul(ceil_log2 as usize)
        };

        if comparisons > bound {
            self.violation(
                "Sort used too many comparisons",
                operation_index,
                format!("{comparisons} comparisons for {len} elements (bound {bound})"),
            );
        }
    }

    /// Check that the index holds exactly the model's entries, in order.
    pub fn check_contents(
        &mut self,
        index: &BalancedIndex<u32, u64>,
        history: &OperationHistory,
        operation_index: usize,
    ) {
        let actual: Vec<(u32, u64)> = index.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u32, u64)> = history
            .expected_state()
            .iter()
            .map(|(k, v)| (*k, *v))
            .collect();

        if actual != expected {
            self.violation(
                "Index contents disagree with model",
                operation_index,
                format!("{} entries in index, {} in model", actual.len(), expected.len()),
            );
        }
    }
}

/// Largest height an AVL tree with `len` entries can have.
///
/// The sparsest AVL tree of height `h` has `F(h + 2) - 1` nodes, where `F` is
/// the Fibonacci sequence.
#[must_use]
pub const fn avl_height_bound(len: usize) -> u32 {
    if len == 0 {
        return 0;
    }
    // min_nodes[h] = min_nodes[h - 1] + min_nodes[h - 2] + 1
    let (mut shorter, mut taller) = (0usize, 1usize);
    let mut height = 1;
    loop {
        let next = shorter.saturating_add(taller).saturating_add(1);
        if next > len {
            return height;
        }
        shorter = taller;
        taller = next;
        height += 1;
    }
}
